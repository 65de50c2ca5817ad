use std::net::Ipv4Addr;

use thiserror::Error;

/// Number of hex digits in a hardware address.
pub const MAC_HEX_LEN: usize = 12;

/// Errors returned when a user-supplied filter cannot be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid IP address '{0}': expected dotted-quad IPv4 such as 192.0.2.10")]
    InvalidIp(String),
    #[error("invalid MAC address '{input}': {reason}")]
    InvalidMac { input: String, reason: String },
}

/// Lease table constraints in the form the table stores them.
///
/// Each field is independent; `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub subnet_id: Option<u32>,
    pub address: Option<u32>,
    pub hwaddr: Option<[u8; 6]>,
}

impl FilterSet {
    /// Normalize raw command-line filter values.
    pub fn from_args(
        subnet_id: Option<u32>,
        ip: Option<&str>,
        mac: Option<&str>,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            subnet_id,
            address: ip.map(parse_ip).transpose()?,
            hwaddr: mac.map(parse_mac).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.subnet_id.is_none() && self.address.is_none() && self.hwaddr.is_none()
    }
}

/// Parse a dotted-quad IPv4 address into its unsigned 32-bit form.
pub fn parse_ip(raw: &str) -> Result<u32, FilterError> {
    raw.trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| FilterError::InvalidIp(raw.to_string()))
}

/// Parse a MAC address written with `:`, `.` or `-` separators (or none).
pub fn parse_mac(raw: &str) -> Result<[u8; 6], FilterError> {
    let invalid = |reason: String| FilterError::InvalidMac {
        input: raw.to_string(),
        reason,
    };

    let hex: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ':' | '.' | '-'))
        .collect();
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(format!("'{bad}' is not a hex digit")));
    }
    if hex.len() != MAC_HEX_LEN {
        return Err(invalid(format!(
            "expected {MAC_HEX_LEN} hex digits, found {}",
            hex.len()
        )));
    }

    let mut bytes = [0u8; 6];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|err| invalid(err.to_string()))?;
    }
    Ok(bytes)
}
