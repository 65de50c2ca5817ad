use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kea_leases::render::Format;

pub const DEFAULT_CONFIG: &str = "/etc/kea/kea-dhcp4.conf";

#[derive(Parser, Debug)]
#[command(name = "kea-leases")]
#[command(version, about = "Show Kea DHCPv4 leases from the lease database")]
pub struct Cli {
    /// Only show leases in this subnet.
    #[arg(long)]
    pub subnet_id: Option<u32>,
    /// Only show the lease for this IPv4 address.
    #[arg(long)]
    pub ip_address: Option<String>,
    /// Only show leases for this MAC (aa:bb:cc:dd:ee:ff or aabb.ccdd.eeff).
    #[arg(long)]
    pub mac_address: Option<String>,
    /// Kea DHCPv4 configuration file holding the lease-database settings.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Display)]
    pub output: OutputFormat,
    /// Log filter used when RUST_LOG is unset; logs go to stderr.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Display,
    Json,
    Csv,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Display => Format::Display,
            OutputFormat::Json => Format::Json,
            OutputFormat::Csv => Format::Csv,
        }
    }
}
