// file: src/dhcp/leases.rs
// version: 1.0.0
// guid: 91009512-0321-4702-b3f7-d8782e78a009

//! dnsmasq lease file reading and MAC-to-address resolution

use crate::mapping::MacAddress;
use crate::utils::clock::Sleeper;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default number of lease file scans per MAC address
pub const DEFAULT_LEASE_ATTEMPTS: u32 = 5;

/// Default delay between lease file scans
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// One line of the dnsmasq lease database:
/// `<expiry> <mac> <ip> <hostname> <client-id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseRecord {
    pub expires_at: Option<DateTime<Utc>>,
    pub hardware_address: String,
    pub assigned_address: IpAddr,
    pub hostname: Option<String>,
}

impl LeaseRecord {
    /// Parse a lease line; `None` for lines with fewer than three fields or
    /// an unparseable address
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return None;
        }

        let assigned_address = fields[2].parse::<IpAddr>().ok()?;
        let expires_at = fields[0]
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        let hostname = fields
            .get(3)
            .filter(|h| **h != "*")
            .map(|h| h.to_string());

        Some(Self {
            expires_at,
            hardware_address: fields[1].to_string(),
            assigned_address,
            hostname,
        })
    }
}

/// Parse every well-formed record of a lease file, in file order
pub fn parse_leases(contents: &str) -> Vec<LeaseRecord> {
    contents.lines().filter_map(LeaseRecord::parse).collect()
}

/// First record in file order whose MAC matches (case-insensitive)
pub fn find_lease(contents: &str, mac: &MacAddress) -> Option<LeaseRecord> {
    contents
        .lines()
        .filter_map(LeaseRecord::parse)
        .find(|lease| mac.matches(&lease.hardware_address))
}

/// Polls the lease file until a MAC address shows up
pub struct LeaseResolver<'a> {
    sleeper: &'a dyn Sleeper,
}

impl<'a> LeaseResolver<'a> {
    pub fn new(sleeper: &'a dyn Sleeper) -> Self {
        Self { sleeper }
    }

    /// Look up the address currently leased to `mac`.
    ///
    /// Scans the lease file up to `max_attempts` times (at least once),
    /// sleeping `retry_interval` between scans. A missing or unreadable lease
    /// file counts as "no lease" for that scan.
    pub async fn resolve_lease(
        &self,
        mac: &MacAddress,
        leases_file: &Path,
        max_attempts: u32,
        retry_interval: Duration,
    ) -> Option<IpAddr> {
        let max_attempts = max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if let Some(lease) = self.scan_once(mac, leases_file).await {
                debug!(
                    "Lease for {} found on attempt {}: {:?}",
                    mac, attempt, lease
                );
                return Some(lease.assigned_address);
            }

            let remaining = max_attempts - attempt;
            if remaining == 0 {
                break;
            }

            info!(
                "Waiting for DHCP lease for MAC {}... ({} attempts left)",
                mac, remaining
            );
            self.sleeper.sleep(retry_interval).await;
        }

        None
    }

    async fn scan_once(&self, mac: &MacAddress, leases_file: &Path) -> Option<LeaseRecord> {
        let contents = match tokio::fs::read_to_string(leases_file).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("DHCP leases file not found: {}", leases_file.display());
                return None;
            }
            Err(e) => {
                error!("Error reading DHCP leases: {}", e);
                return None;
            }
        };

        let lease = find_lease(&contents, mac);
        if lease.is_none() {
            debug!("No lease found for MAC: {}", mac);
        }
        lease
    }
}
