// file: src/mapping/mod.rs
// version: 1.0.0
// guid: c72e83fc-dbae-48ab-91bb-38b82606390d

//! Input validation for the MAC-to-IP mapping file

pub mod mac;
pub mod parser;

pub use mac::MacAddress;
pub use parser::{parse_mapping, parse_mapping_file, MappingEntry, REQUIRED_COLUMNS};
