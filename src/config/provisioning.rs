// file: src/config/provisioning.rs
// version: 1.0.0
// guid: 229b22f4-b08b-4cd6-80c3-1c1f794d6f7b

//! Provisioning configuration structures

use crate::error::ProvisionError;
use crate::network;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration, immutable after load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Bootstrap network and DHCP pool settings
    pub network: NetworkConfig,
    /// dnsmasq file locations
    pub dhcp: DhcpConfig,
    /// Management controller access
    pub ipmi: IpmiConfig,
    /// Timing of the warm-up and lease polling
    #[serde(default)]
    pub provisioning: RetryConfig,
}

/// Bootstrap network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Local interface that serves the temporary pool (e.g., eth0)
    pub interface: String,
    /// First address handed out by the pool
    pub dhcp_range_start: Ipv4Addr,
    /// Last address handed out by the pool
    pub dhcp_range_end: Ipv4Addr,
    /// Subnet mask of the pool, dotted or as a prefix length
    #[serde(deserialize_with = "deserialize_netmask")]
    pub subnet_mask: Ipv4Addr,
    /// Address assigned to the local interface while the pool is running
    pub gateway: Ipv4Addr,
}

fn deserialize_netmask<'de, D>(deserializer: D) -> Result<Ipv4Addr, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMask {
        Prefix(u8),
        Text(String),
    }

    let raw = match RawMask::deserialize(deserializer)? {
        RawMask::Prefix(prefix) => prefix.to_string(),
        RawMask::Text(text) => text,
    };
    network::parse_netmask(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!(
            "invalid subnet mask {}: {}",
            raw,
            network::NETMASK_FORMS
        )))
}

/// dnsmasq configuration and lease file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhcpConfig {
    /// Generated dnsmasq configuration file (overwritten on every run)
    pub config_file: PathBuf,
    /// dnsmasq lease database
    pub leases_file: PathBuf,
}

/// How the static configuration is pushed to a controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpmiMethod {
    /// Run an external script with positional arguments
    #[default]
    Script,
    /// Call ipmitool directly
    Ipmitool,
}

/// Management controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpmiConfig {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub method: IpmiMethod,
    /// Script invoked by [`IpmiMethod::Script`]
    #[serde(default = "default_script")]
    pub script: PathBuf,
    /// LAN channel used by [`IpmiMethod::Ipmitool`]
    #[serde(default = "default_channel")]
    pub channel: u8,
    /// ipmitool interface (`-I`)
    #[serde(default = "default_ipmi_interface")]
    pub interface: String,
}

/// Management credentials, passed to external tools via environment only
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Warm-up and lease polling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay after restarting dnsmasq before polling leases
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,
    /// Lease file scans per MAC address
    #[serde(default = "default_lease_attempts")]
    pub lease_attempts: u32,
    /// Delay between lease file scans
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            warmup_secs: default_warmup_secs(),
            lease_attempts: default_lease_attempts(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

impl RetryConfig {
    pub fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

fn default_script() -> PathBuf {
    PathBuf::from("./ipmi_set_ip.sh")
}

fn default_channel() -> u8 {
    1
}

fn default_ipmi_interface() -> String {
    "lanplus".to_string()
}

fn default_warmup_secs() -> u64 {
    10
}

fn default_lease_attempts() -> u32 {
    5
}

fn default_retry_interval_secs() -> u64 {
    5
}

impl ProvisioningConfig {
    /// Validate the provisioning configuration
    pub fn validate(&self) -> crate::Result<()> {
        self.network.validate()?;

        if self.dhcp.config_file.as_os_str().is_empty() {
            return Err(ProvisionError::config("dhcp.config_file cannot be empty"));
        }
        if self.dhcp.leases_file.as_os_str().is_empty() {
            return Err(ProvisionError::config("dhcp.leases_file cannot be empty"));
        }

        self.ipmi.validate()?;

        if self.provisioning.lease_attempts == 0 {
            return Err(ProvisionError::config(
                "provisioning.lease_attempts must be at least 1",
            ));
        }

        Ok(())
    }
}

impl NetworkConfig {
    /// Validate network configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.interface.trim().is_empty() {
            return Err(ProvisionError::config("network.interface cannot be empty"));
        }

        if u32::from(self.dhcp_range_start) > u32::from(self.dhcp_range_end) {
            return Err(ProvisionError::config(format!(
                "DHCP range start {} is after range end {}",
                self.dhcp_range_start, self.dhcp_range_end
            )));
        }

        if !network::is_valid_netmask(self.subnet_mask) {
            return Err(ProvisionError::config(format!(
                "Invalid subnet mask: {}",
                self.subnet_mask
            )));
        }

        Ok(())
    }
}

impl IpmiConfig {
    /// Validate management controller settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.credentials.username.is_empty() {
            return Err(ProvisionError::config("ipmi.username cannot be empty"));
        }
        if self.credentials.password.is_empty() {
            return Err(ProvisionError::config("ipmi.password cannot be empty"));
        }
        if self.method == IpmiMethod::Script && self.script.as_os_str().is_empty() {
            return Err(ProvisionError::config("ipmi.script cannot be empty"));
        }
        Ok(())
    }
}
