// file: src/provisioner/mod.rs
// version: 1.0.0
// guid: 354adbde-220f-43b3-8982-c3d7e463e8fd

//! Provisioning orchestrator
//!
//! Runs the whole flow in a fixed order:
//!
//! ```text
//! Idle -> Validating -> BootstrappingNetwork -> StartingPool
//!      -> AwaitingPoolWarmup -> ProcessingEntries -> Done
//! ```
//!
//! Any fatal error moves the provisioner to `Failed` and is returned to the
//! caller. Failures of a single entry (no lease, device rejected the
//! settings) are logged and only show up in the [`RunSummary`].

use crate::config::ProvisioningConfig;
use crate::dhcp::{start_dhcp_pool, LeaseResolver};
use crate::error::ProvisionError;
use crate::executor::SystemCommand;
use crate::ipmi::DeviceConfigurator;
use crate::mapping::{parse_mapping_file, MappingEntry};
use crate::network::bootstrap_interface;
use crate::utils::clock::Sleeper;
use crate::utils::system::SystemUtils;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Tools that must be installed before anything is touched
pub const PRECONDITION_TOOLS: [&str; 3] = ["ip", "systemctl", "ipmitool"];

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProvisionState {
    Idle,
    Validating,
    BootstrappingNetwork,
    StartingPool,
    AwaitingPoolWarmup,
    ProcessingEntries,
    Done,
    Failed,
}

impl ProvisionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_entries: usize,
    pub succeeded_count: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn failed_count(&self) -> usize {
        self.total_entries - self.succeeded_count
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully configured {}/{} devices",
            self.succeeded_count, self.total_entries
        )
    }
}

/// Sequences validation, network bootstrap, the DHCP pool and per-device
/// configuration
pub struct Provisioner<'a> {
    config: &'a ProvisioningConfig,
    system: &'a dyn SystemCommand,
    sleeper: &'a dyn Sleeper,
    state: ProvisionState,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        config: &'a ProvisioningConfig,
        system: &'a dyn SystemCommand,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            config,
            system,
            sleeper,
            state: ProvisionState::Idle,
        }
    }

    pub fn state(&self) -> ProvisionState {
        self.state
    }

    /// Provision every valid entry of `mapping_file`.
    ///
    /// Returns an error only for fatal failures. A completed run with some
    /// failed devices is still `Ok`.
    pub async fn run(&mut self, mapping_file: &Path) -> Result<RunSummary> {
        if self.state != ProvisionState::Idle {
            return Err(ProvisionError::config(format!(
                "Provisioner already ran (state {:?})",
                self.state
            )));
        }

        match self.execute(mapping_file).await {
            Ok(summary) => {
                self.transition(ProvisionState::Done);
                info!("IPMI configuration completed. {}.", summary);
                Ok(summary)
            }
            Err(e) => {
                debug!("Provisioning failed during {:?}: {}", self.state, e);
                self.transition(ProvisionState::Failed);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, mapping_file: &Path) -> Result<RunSummary> {
        let started_at = Utc::now();

        self.transition(ProvisionState::Validating);
        self.check_preconditions()?;
        let entries = parse_mapping_file(mapping_file)?;
        if entries.is_empty() {
            return Err(ProvisionError::input(
                "No valid entries found in the CSV file. Nothing to provision.",
            ));
        }

        let config = self.config;
        self.transition(ProvisionState::BootstrappingNetwork);
        bootstrap_interface(self.system, &config.network.interface, config.network.gateway).await?;

        self.transition(ProvisionState::StartingPool);
        start_dhcp_pool(self.system, config).await?;

        self.transition(ProvisionState::AwaitingPoolWarmup);
        info!("Waiting for DHCP server to initialize...");
        self.sleeper.sleep(config.provisioning.warmup()).await;

        self.transition(ProvisionState::ProcessingEntries);
        let succeeded_count = self.process_entries(&entries).await?;

        Ok(RunSummary {
            total_entries: entries.len(),
            succeeded_count,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// Root privilege and required tools, checked before any side effect
    fn check_preconditions(&self) -> Result<()> {
        if !self.system.is_privileged() {
            return Err(ProvisionError::permission(
                "This program must be run as root to configure DHCP and networking.",
            ));
        }

        if let Some(tool) = SystemUtils::missing_tools(self.system, &PRECONDITION_TOOLS)
            .into_iter()
            .next()
        {
            return Err(ProvisionError::missing_tool(
                tool,
                SystemUtils::install_hint(tool),
            ));
        }

        Ok(())
    }

    /// Resolve and configure each entry in file order; returns the number of
    /// devices configured
    async fn process_entries(&self, entries: &[MappingEntry]) -> Result<usize> {
        let resolver = LeaseResolver::new(self.sleeper);
        let configurator = DeviceConfigurator::new(self.system, &self.config.ipmi);
        let mut succeeded = 0;

        for entry in entries {
            let outcome = self.provision_entry(&resolver, &configurator, entry).await;
            if settle_entry(entry, outcome)? {
                succeeded += 1;
            }
        }

        Ok(succeeded)
    }

    async fn provision_entry(
        &self,
        resolver: &LeaseResolver<'_>,
        configurator: &DeviceConfigurator<'_>,
        entry: &MappingEntry,
    ) -> Result<()> {
        let mac = &entry.hardware_address;
        let retry = &self.config.provisioning;
        info!("Looking for IP assigned to MAC: {}...", mac);

        let dhcp_ip = resolver
            .resolve_lease(
                mac,
                &self.config.dhcp.leases_file,
                retry.lease_attempts,
                retry.retry_interval(),
            )
            .await
            .ok_or_else(|| ProvisionError::LeaseNotFound(mac.to_string()))?;

        info!(
            "Found {} for {}. Assigning static IP {}...",
            dhcp_ip, mac, entry.static_address
        );
        configurator.apply_static_config(dhcp_ip, entry).await
    }

    fn transition(&mut self, next: ProvisionState) {
        debug!("Provisioner state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Log a per-entry failure and report whether the entry succeeded.
///
/// Errors that are not tied to a single entry are handed back to abort the run.
fn settle_entry(entry: &MappingEntry, outcome: Result<()>) -> Result<bool> {
    match outcome {
        Ok(()) => Ok(true),
        Err(ProvisionError::LeaseNotFound(mac)) => {
            warn!(
                "No DHCP IP found for MAC {} after multiple attempts. Skipping...",
                mac
            );
            Ok(false)
        }
        Err(e) if e.is_per_entry() => {
            error!("Line {}: {}", entry.line, e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
