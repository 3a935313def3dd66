// file: src/config/mod.rs
// version: 2.0.0
// guid: d4e741c8-3e7c-4850-9143-daf076ab03d1

//! Configuration module for IPMIrage
//!
//! Handles loading and validation of the provisioning configuration
//! (`config.yaml`). The configuration is loaded once at startup and passed by
//! reference to every component.

pub mod loader;
pub mod provisioning;

pub use loader::ConfigLoader;
pub use provisioning::{
    Credentials, DhcpConfig, IpmiConfig, IpmiMethod, NetworkConfig, ProvisioningConfig,
    RetryConfig,
};

/// Default configuration file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default mapping file name, relative to the working directory
pub const DEFAULT_MAPPING_FILE: &str = "mac_to_ip.csv";

/// Default log file name
pub const DEFAULT_LOG_FILE: &str = "ipmirage.log";
