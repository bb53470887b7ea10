//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for geolocator using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Geolocator - IP geolocation lookup service backed by a MaxMind database
#[derive(Parser, Debug)]
#[command(name = "geolocator")]
#[command(version)]
#[command(about = "IP geolocation lookup service backed by a MaxMind database", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Look up a single IP address and print the JSON result
    Lookup {
        /// IPv4 or IPv6 address
        ip: String,
    },

    /// Generate an example configuration file
    GenerateConfig {
        /// Output path (default: print to stdout)
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
