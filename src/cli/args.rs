// file: src/cli/args.rs
// version: 2.0.0
// guid: 685695e5-5c42-4f61-bbaa-01acdf4cf900

//! Command line argument definitions

use crate::config::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE, DEFAULT_MAPPING_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipmirage")]
#[command(about = "Assign static IPMI/BMC addresses to servers discovered through a temporary DHCP pool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log file, appended to on every run
    #[arg(long, global = true, env = "IPMIRAGE_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to stdout only
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision every controller listed in the mapping file
    Run {
        /// Configuration file, relative to the current directory
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// MAC-to-IP mapping file, relative to the current directory
        #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
        mapping: PathBuf,

        #[arg(long, help = "Validate inputs and show the dnsmasq config without touching the system")]
        dry_run: bool,
    },

    /// Validate the MAC-to-IP mapping file
    Validate {
        /// MAC-to-IP mapping file, relative to the current directory
        #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
        mapping: PathBuf,

        #[arg(short, long)]
        json: bool,
    },

    /// Check privileges and required system tools
    CheckPrereqs,

    /// Look up the DHCP address currently leased to a MAC address
    Lookup {
        /// Configuration file, relative to the current directory
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        #[arg(long, help = "MAC address in any common notation")]
        mac: String,
    },
}
