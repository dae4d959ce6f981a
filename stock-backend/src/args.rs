//! Command-line arguments and the server configuration derived from them.

use clap::Parser;
use std::path::PathBuf;

/// Stock Price API server.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerArgs {
    /// CSV file holding the daily price table
    #[arg(long, default_value = "clean_stocks.csv")]
    data_file: PathBuf,

    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP listener
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl ServerArgs {
    pub fn parse_args(args: Vec<String>) -> Self {
        ServerArgs::parse_from(args)
    }

    pub fn get_log_level(&self) -> &str {
        &self.log_level
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("clean_stocks.csv"),
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&ServerArgs> for ServerConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            data_file: args.data_file.clone(),
            host: args.host.clone(),
            port: args.port,
        }
    }
}
