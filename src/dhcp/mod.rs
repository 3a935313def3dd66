// file: src/dhcp/mod.rs
// version: 1.0.0
// guid: d3e2be8b-6362-45e9-b7a7-e4e040b4d750

//! Temporary DHCP pool management and lease lookup
//!
//! The pool itself is served by dnsmasq; this module only writes its
//! configuration, restarts the service and reads its lease database.

pub mod leases;
pub mod pool;

pub use leases::{find_lease, parse_leases, LeaseRecord, LeaseResolver};
pub use pool::{render_dnsmasq_config, start_dhcp_pool};
