// file: src/logging/mod.rs
// version: 1.1.0
// guid: ea1701ba-7294-4797-a39a-fca90f5882ac

//! Logging system for IPMIrage

pub mod logger;

pub use logger::init_logger;
