// file: src/cli/mod.rs
// version: 1.1.0
// guid: 8c15094e-b843-4006-8108-cdd689d74fea

//! Command line interface for IPMIrage

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
