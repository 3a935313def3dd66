// file: src/mapping/parser.rs
// version: 1.0.0
// guid: e94a8962-0f59-4baf-8739-5fc3d25f3083

//! MAC-to-IP mapping file parsing

use super::MacAddress;
use crate::error::ProvisionError;
use crate::network;
use crate::Result;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use tracing::{info, warn};

/// Columns every mapping file must declare
pub const REQUIRED_COLUMNS: [&str; 4] = ["MAC", "STATIC_IP", "NETMASK", "GATEWAY"];

/// One validated row of the mapping file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub hardware_address: MacAddress,
    pub static_address: IpAddr,
    pub netmask: Ipv4Addr,
    pub gateway: IpAddr,
    /// 1-based line in the source file
    pub line: u64,
}

/// Parse and validate the mapping file at `path`.
///
/// A missing file or a header with fewer than four columns is an error.
/// Invalid rows are logged and skipped.
pub fn parse_mapping_file<P: AsRef<Path>>(path: P) -> Result<Vec<MappingEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProvisionError::file_not_found(format!(
            "Missing CSV file: {}. Please create a CSV file with MAC-to-IP mappings.",
            path.display()
        )));
    }

    let file = std::fs::File::open(path).map_err(|e| {
        ProvisionError::input(format!("Failed to open CSV file {}: {}", path.display(), e))
    })?;

    let entries = parse_mapping(file)?;
    info!(
        "Successfully loaded {} valid entries from CSV file",
        entries.len()
    );
    Ok(entries)
}

/// Parse mapping rows from any reader
pub fn parse_mapping<R: Read>(reader: R) -> Result<Vec<MappingEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = reader.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => return Err(e.into()),
        None => {
            return Err(ProvisionError::input(format!(
                "CSV file is empty. Expected header: {}",
                REQUIRED_COLUMNS.join(", ")
            )))
        }
    };

    if header.len() < REQUIRED_COLUMNS.len() {
        return Err(ProvisionError::input(format!(
            "CSV file must have at least {} columns: {}. Found: {:?}",
            REQUIRED_COLUMNS.len(),
            REQUIRED_COLUMNS.join(", "),
            header.iter().collect::<Vec<_>>()
        )));
    }

    let mut entries = Vec::new();
    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable row: {}", e);
                continue;
            }
        };

        if let Some(entry) = validate_row(&record) {
            entries.push(entry);
        }
    }

    Ok(entries)
}

/// Validate a single data row, logging why it was rejected
fn validate_row(record: &StringRecord) -> Option<MappingEntry> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let fields: Vec<&str> = record.iter().collect();

    if fields.len() < REQUIRED_COLUMNS.len() {
        warn!("Line {}: Incomplete data: {:?}", line, fields);
        return None;
    }

    let (mac, static_ip, netmask, gateway) = (fields[0], fields[1], fields[2], fields[3]);

    let Some(hardware_address) = MacAddress::normalize(mac) else {
        warn!("Line {}: Invalid MAC address format: {}", line, mac);
        return None;
    };

    let (Ok(static_address), Ok(gateway)) = (static_ip.parse::<IpAddr>(), gateway.parse::<IpAddr>())
    else {
        warn!("Line {}: Invalid IP address in: {:?}", line, fields);
        return None;
    };

    let Some(netmask) = network::parse_netmask(netmask) else {
        warn!(
            "Line {}: Invalid netmask {} ({})",
            line,
            netmask,
            network::NETMASK_FORMS
        );
        return None;
    };

    Some(MappingEntry {
        hardware_address,
        static_address,
        netmask,
        gateway,
        line,
    })
}
