// file: src/ipmi/mod.rs
// version: 1.0.0
// guid: 277e3a3b-0d93-45c3-a039-697dac5f85d8

//! Pushes static network settings to a management controller.
//!
//! The management protocol itself is handled by an external program: either
//! a user supplied script or ipmitool. Credentials only ever travel through
//! the child's environment.

use crate::config::{IpmiConfig, IpmiMethod};
use crate::error::ProvisionError;
use crate::executor::SystemCommand;
use crate::mapping::MappingEntry;
use crate::Result;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, info};

/// Environment variables read by the configuration script
pub const SCRIPT_USERNAME_ENV: &str = "USERNAME";
pub const SCRIPT_PASSWORD_ENV: &str = "PASSWORD";

/// Environment variable read by `ipmitool -E`
pub const IPMITOOL_PASSWORD_ENV: &str = "IPMI_PASSWORD";

/// Applies a [`MappingEntry`] to the controller reachable at a DHCP address
pub struct DeviceConfigurator<'a> {
    system: &'a dyn SystemCommand,
    config: &'a IpmiConfig,
}

impl<'a> DeviceConfigurator<'a> {
    pub fn new(system: &'a dyn SystemCommand, config: &'a IpmiConfig) -> Self {
        Self { system, config }
    }

    /// Configure the controller currently at `current_address` with the
    /// static settings of `entry`.
    ///
    /// Every failure is a [`ProvisionError::Device`], which only affects this
    /// entry.
    pub async fn apply_static_config(
        &self,
        current_address: IpAddr,
        entry: &MappingEntry,
    ) -> Result<()> {
        match self.config.method {
            IpmiMethod::Script => self.apply_with_script(current_address, entry).await?,
            IpmiMethod::Ipmitool => self.apply_with_ipmitool(current_address, entry).await?,
        }

        info!("Successfully configured IPMI: {}", entry.static_address);
        Ok(())
    }

    async fn apply_with_script(&self, current_address: IpAddr, entry: &MappingEntry) -> Result<()> {
        let script = &self.config.script;
        ensure_executable(script)?;

        let program = script.to_string_lossy();
        let current = current_address.to_string();
        let target = entry.static_address.to_string();
        let netmask = entry.netmask.to_string();
        let gateway = entry.gateway.to_string();
        let credentials = &self.config.credentials;

        let output = self
            .system
            .run(
                &program,
                &[current.as_str(), target.as_str(), netmask.as_str(), gateway.as_str()],
                &[
                    (SCRIPT_USERNAME_ENV, credentials.username.as_str()),
                    (SCRIPT_PASSWORD_ENV, credentials.password.as_str()),
                ],
            )
            .await
            .map_err(|e| ProvisionError::device(format!("Failed to run {}: {}", program, e)))?;

        if !output.success() {
            debug!("Error output: {}", output.stderr);
            return Err(ProvisionError::device(format!(
                "Failed to configure IPMI for {} (exit code {:?}): {}",
                target,
                output.exit_code,
                output.diagnostic()
            )));
        }

        debug!("IPMI configuration output: {}", output.stdout);
        Ok(())
    }

    async fn apply_with_ipmitool(&self, current_address: IpAddr, entry: &MappingEntry) -> Result<()> {
        let IpAddr::V4(target) = entry.static_address else {
            return Err(ProvisionError::device(format!(
                "ipmitool can only assign IPv4 addresses, got {}",
                entry.static_address
            )));
        };
        let IpAddr::V4(gateway) = entry.gateway else {
            return Err(ProvisionError::device(format!(
                "ipmitool can only assign an IPv4 gateway, got {}",
                entry.gateway
            )));
        };

        let channel = self.config.channel.to_string();
        let netmask = entry.netmask.to_string();
        let gateway = gateway.to_string();
        let target = target.to_string();

        // ipaddr goes last: the controller stops answering on the DHCP address
        let steps: [Vec<&str>; 4] = [
            vec!["ipsrc", "static"],
            vec!["netmask", netmask.as_str()],
            vec!["defgw", "ipaddr", gateway.as_str()],
            vec!["ipaddr", target.as_str()],
        ];

        let host = current_address.to_string();
        let credentials = &self.config.credentials;

        for step in &steps {
            let mut args = vec![
                "-I",
                self.config.interface.as_str(),
                "-H",
                host.as_str(),
                "-U",
                credentials.username.as_str(),
                "-E",
                "lan",
                "set",
                channel.as_str(),
            ];
            args.extend(step.iter().copied());

            let output = self
                .system
                .run(
                    "ipmitool",
                    &args,
                    &[(IPMITOOL_PASSWORD_ENV, credentials.password.as_str())],
                )
                .await
                .map_err(|e| ProvisionError::device(format!("Failed to run ipmitool: {}", e)))?;

            if !output.success() {
                return Err(ProvisionError::device(format!(
                    "ipmitool lan set {} {} failed for {}: {}",
                    channel,
                    step.join(" "),
                    host,
                    output.diagnostic()
                )));
            }
            debug!("ipmitool lan set {}: {}", step.join(" "), output.stdout.trim());
        }

        Ok(())
    }
}

/// Make sure the script exists and carries an executable bit
fn ensure_executable(script: &Path) -> Result<()> {
    let metadata = std::fs::metadata(script).map_err(|_| {
        ProvisionError::device(format!(
            "IPMI configuration script not found: {}",
            script.display()
        ))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if metadata.permissions().mode() & 0o111 == 0 {
            debug!("Marking {} executable", script.display());
            std::fs::set_permissions(script, std::fs::Permissions::from_mode(0o755)).map_err(
                |e| {
                    ProvisionError::device(format!(
                        "IPMI configuration script {} is not executable and could not be fixed: {}",
                        script.display(),
                        e
                    ))
                },
            )?;
        }
    }
    #[cfg(not(unix))]
    let _ = metadata;

    Ok(())
}
