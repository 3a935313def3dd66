// file: src/dhcp/pool.rs
// version: 1.0.0
// guid: 2781c725-63d5-431e-b8f9-05cace6bb81c

//! Temporary DHCP pool backed by dnsmasq

use crate::config::{NetworkConfig, ProvisioningConfig};
use crate::error::ProvisionError;
use crate::executor::SystemCommand;
use crate::utils::system::SystemUtils;
use crate::Result;
use std::path::Path;
use tracing::{debug, info};

/// Lease duration written into the pool definition
pub const LEASE_DURATION: &str = "12h";

/// dnsmasq binary and systemd unit name
pub const DNSMASQ: &str = "dnsmasq";

/// Render the dnsmasq configuration for the bootstrap pool
pub fn render_dnsmasq_config(network: &NetworkConfig) -> String {
    format!(
        "interface={}\ndhcp-range={},{},{},{}\nlog-dhcp\n",
        network.interface,
        network.dhcp_range_start,
        network.dhcp_range_end,
        network.subnet_mask,
        LEASE_DURATION
    )
}

/// Write `contents` to `path`, creating the parent directory when missing
pub async fn write_dnsmasq_config(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                ProvisionError::dhcp(format!("Failed to create directory {}: {}", dir.display(), e))
            })?;
            debug!("Created directory {}", dir.display());
        }
    }

    tokio::fs::write(path, contents).await.map_err(|e| {
        ProvisionError::dhcp(format!(
            "Failed to write DHCP configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    debug!("Wrote dnsmasq configuration to {}", path.display());
    Ok(())
}

/// Write the pool configuration and restart dnsmasq.
///
/// Requires root; the check happens before anything is written.
pub async fn start_dhcp_pool(system: &dyn SystemCommand, config: &ProvisioningConfig) -> Result<()> {
    if !system.is_privileged() {
        return Err(ProvisionError::permission(
            "This program must be run as root to configure DHCP.",
        ));
    }

    info!("Setting up DHCP pool for IPMI discovery...");

    let rendered = render_dnsmasq_config(&config.network);
    write_dnsmasq_config(&config.dhcp.config_file, &rendered).await?;

    if !system.command_exists(DNSMASQ) {
        return Err(ProvisionError::missing_tool(
            DNSMASQ,
            SystemUtils::install_hint(DNSMASQ),
        ));
    }

    system
        .run("systemctl", &["restart", DNSMASQ], &[])
        .await?
        .into_result("systemctl restart dnsmasq")
        .map_err(|e| ProvisionError::dhcp(format!("Failed to start dnsmasq: {}", e)))?;

    info!("DHCP pool is running. Waiting for devices to obtain IPs...");
    Ok(())
}
