// file: src/lib.rs
// version: 3.0.0
// guid: 9faa70c1-a895-49eb-848d-b82358abfb80

//! # IPMIrage
//!
//! Provisions out-of-band management controllers on a batch of servers. A
//! temporary dnsmasq pool hands every controller a DHCP address, the lease
//! file maps each MAC address to that address, and an external action then
//! pushes the permanent static configuration listed in the mapping file.
//!
//! Everything runs sequentially on one task; all host interaction goes
//! through [`executor::SystemCommand`] and all waiting through
//! [`utils::clock::Sleeper`].

pub mod cli;
pub mod config;
pub mod dhcp;
pub mod error;
pub mod executor;
pub mod ipmi;
pub mod logging;
pub mod mapping;
pub mod network;
pub mod provisioner;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ProvisionError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
