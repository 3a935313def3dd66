// file: src/network/mod.rs
// version: 2.0.0
// guid: 8479428e-79a4-48f0-86e9-63f82d872ca0

//! Network operations module

pub mod bootstrap;

pub use bootstrap::{bootstrap_interface, BOOTSTRAP_PREFIX_LEN};

use std::net::Ipv4Addr;

/// Accepted netmask notations, quoted in rejection messages
pub const NETMASK_FORMS: &str =
    "expected a contiguous dotted mask or a prefix length 0-32; hostmasks such as 0.0.0.255 are refused";

/// Check that a mask is a run of ones followed by a run of zeros
pub fn is_valid_netmask(mask: Ipv4Addr) -> bool {
    let bits = u32::from(mask);
    bits.leading_ones() + bits.trailing_zeros() == 32
}

/// Convert a prefix length (0-32) into a dotted netmask
pub fn prefix_to_netmask(prefix: u8) -> Option<Ipv4Addr> {
    match prefix {
        0 => Some(Ipv4Addr::UNSPECIFIED),
        1..=32 => Some(Ipv4Addr::from(u32::MAX << (32 - u32::from(prefix)))),
        _ => None,
    }
}

/// Parse a netmask written either as a dotted mask or as a prefix length.
///
/// Inverted (host) masks are refused rather than flipped.
pub fn parse_netmask(raw: &str) -> Option<Ipv4Addr> {
    let raw = raw.trim().trim_start_matches('/');
    if let Ok(prefix) = raw.parse::<u8>() {
        return prefix_to_netmask(prefix);
    }
    raw.parse::<Ipv4Addr>().ok().filter(|mask| is_valid_netmask(*mask))
}
