// file: src/cli/commands.rs
// version: 2.0.0
// guid: 42f70c29-7ffa-44e5-a472-8534862c9a18

//! Command implementations for the CLI

use crate::{
    config::ConfigLoader,
    dhcp::{render_dnsmasq_config, LeaseResolver},
    error::ProvisionError,
    executor::LocalSystem,
    mapping::{parse_mapping_file, MacAddress, MappingEntry},
    provisioner::Provisioner,
    utils::{
        clock::TokioSleeper,
        system::{SystemUtils, REQUIRED_TOOLS},
    },
    Result,
};
use std::path::Path;
use tracing::{error, info, warn};

/// Provision every controller in the mapping file
pub async fn run_command(config_path: &Path, mapping_path: &Path, dry_run: bool) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load_provisioning_config(config_path)?;

    if dry_run {
        let entries = load_entries(mapping_path)?;
        info!(
            "DRY RUN: Would set {} to {}/24 and write {}",
            config.network.interface,
            config.network.gateway,
            config.dhcp.config_file.display()
        );
        println!("# {}", config.dhcp.config_file.display());
        print!("{}", render_dnsmasq_config(&config.network));
        println!();
        print_entries(&entries);
        return Ok(());
    }

    let system = LocalSystem::new();
    let sleeper = TokioSleeper;
    let mut provisioner = Provisioner::new(&config, &system, &sleeper);
    let summary = provisioner.run(mapping_path).await?;

    if summary.failed_count() > 0 {
        warn!(
            "{} device(s) were not configured, see the log for details",
            summary.failed_count()
        );
    }

    Ok(())
}

/// Validate the mapping file and print the entries that passed
pub async fn validate_command(mapping_path: &Path, json_output: bool) -> Result<()> {
    let entries = load_entries(mapping_path)?;

    if json_output {
        let json = serde_json::to_string_pretty(&entries)?;
        println!("{}", json);
    } else {
        print_entries(&entries);
    }

    Ok(())
}

/// Check system prerequisites
pub async fn check_prerequisites_command() -> Result<()> {
    info!("Checking system prerequisites for IPMI provisioning");

    let system = LocalSystem::new();
    let missing = SystemUtils::missing_tools(&system, &REQUIRED_TOOLS);

    for tool in REQUIRED_TOOLS {
        if missing.contains(&tool) {
            error!("✗ {} not found. {}", tool, SystemUtils::install_hint(tool));
        } else {
            info!("✓ {} is available", tool);
        }
    }

    let root = SystemUtils::is_root();
    if root {
        info!("✓ Running as root");
    } else {
        error!("✗ Not running as root - provisioning requires sudo");
    }

    if let Some(tool) = missing.first() {
        return Err(ProvisionError::missing_tool(
            *tool,
            SystemUtils::install_hint(tool),
        ));
    }
    if !root {
        return Err(ProvisionError::permission(
            "Provisioning must be run as root",
        ));
    }

    info!("All prerequisites satisfied");
    Ok(())
}

/// Resolve the DHCP address of a single MAC address
pub async fn lookup_command(config_path: &Path, mac: &str) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load_provisioning_config(config_path)?;
    let mac: MacAddress = mac.parse()?;

    let sleeper = TokioSleeper;
    let resolver = LeaseResolver::new(&sleeper);
    let retry = &config.provisioning;

    match resolver
        .resolve_lease(
            &mac,
            &config.dhcp.leases_file,
            retry.lease_attempts,
            retry.retry_interval(),
        )
        .await
    {
        Some(ip) => {
            println!("{} {}", mac, ip);
            Ok(())
        }
        None => Err(ProvisionError::LeaseNotFound(mac.to_string())),
    }
}

fn load_entries(mapping_path: &Path) -> Result<Vec<MappingEntry>> {
    let entries = parse_mapping_file(mapping_path)?;
    if entries.is_empty() {
        return Err(ProvisionError::input(
            "No valid entries found in the CSV file.",
        ));
    }
    Ok(entries)
}

fn print_entries(entries: &[MappingEntry]) {
    println!(
        "{:<6} {:<18} {:<40} {:<16} {:<40}",
        "Line", "MAC", "Static IP", "Netmask", "Gateway"
    );
    println!("{:-<120}", "");

    for entry in entries {
        println!(
            "{:<6} {:<18} {:<40} {:<16} {:<40}",
            entry.line,
            entry.hardware_address.as_str(),
            entry.static_address.to_string(),
            entry.netmask.to_string(),
            entry.gateway.to_string()
        );
    }

    info!("Found {} valid entries", entries.len());
}
