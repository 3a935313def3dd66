// file: src/mapping/mac.rs
// version: 1.0.0
// guid: 7a775afe-0f50-4cbc-b117-deb4bd2ee05b

//! Hardware address normalization

use crate::error::ProvisionError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A six-octet hardware address in canonical `AA:BB:CC:DD:EE:FF` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalize a MAC address written with colons, dashes, dots, spaces or
    /// no separators at all.
    ///
    /// Returns `None` unless exactly 12 hex digits remain once the separators
    /// are removed.
    pub fn normalize(raw: &str) -> Option<Self> {
        let hex: String = raw
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.') && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let octets: Vec<&str> = (0..12).step_by(2).map(|i| &hex[i..i + 2]).collect();
        Some(Self(octets.join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a MAC as written in a lease file
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
            .ok_or_else(|| ProvisionError::input(format!("Invalid MAC address format: {}", s)))
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
