// file: src/network/bootstrap.rs
// version: 1.0.0
// guid: 90fe6f24-59ca-4af4-bd88-f92f90e1a112

//! Temporary addressing of the interface that serves the DHCP pool

use crate::error::ProvisionError;
use crate::executor::SystemCommand;
use crate::Result;
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// Prefix length used for the bootstrap address
pub const BOOTSTRAP_PREFIX_LEN: u8 = 24;

/// Give `interface` the address `address/24` and bring it up.
///
/// Flushing existing addresses is best-effort. Failing to add the address or
/// to bring the link up is fatal.
pub async fn bootstrap_interface(
    system: &dyn SystemCommand,
    interface: &str,
    address: Ipv4Addr,
) -> Result<()> {
    info!("Setting {} IP to {} to serve DHCP requests...", interface, address);

    match system.run("ip", &["addr", "flush", "dev", interface], &[]).await {
        Ok(output) if !output.success() => {
            warn!(
                "Could not flush addresses on {}: {}",
                interface,
                output.diagnostic()
            );
        }
        Err(e) => warn!("Could not flush addresses on {}: {}", interface, e),
        Ok(_) => {}
    }

    let cidr = format!("{}/{}", address, BOOTSTRAP_PREFIX_LEN);
    system
        .run("ip", &["addr", "add", &cidr, "dev", interface], &[])
        .await?
        .into_result("ip addr add")
        .map_err(|e| {
            ProvisionError::network(format!(
                "Failed to assign {} to interface {}: {}",
                cidr, interface, e
            ))
        })?;

    system
        .run("ip", &["link", "set", interface, "up"], &[])
        .await?
        .into_result("ip link set up")
        .map_err(|e| {
            ProvisionError::network(format!("Failed to bring interface {} up: {}", interface, e))
        })?;

    info!("{} is now set to {} and ready to assign IPs.", interface, address);
    Ok(())
}
