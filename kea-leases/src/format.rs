//! Turning stored lease values into display text.
//!
//! Nothing in here fails: a malformed value already in the database becomes
//! a [`Field::Diagnostic`] so the rest of the report still prints.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::lease::LeaseRow;

/// Number of hex digits in a well-formed client identifier.
pub const CLIENT_ID_HEX_LEN: usize = 14;

/// Placeholder for an absent hardware address or client identifier.
pub const ABSENT: &str = "None";

pub const EXPIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const HEADERS: [&str; 7] = [
    "Subnet ID",
    "IP Address",
    "MAC Address",
    "Client ID",
    "Valid Lifetime",
    "Expire",
    "Hostname",
];

/// A formatted text field, or a placeholder explaining why it could not be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Value(String),
    Diagnostic(String),
}

impl Field {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(s) | Self::Diagnostic(s) => s,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic(_))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output cell. Integers stay integers so JSON can emit numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Integer(i64),
    Text(String),
    Field(Field),
}

impl Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Field(field) => serializer.serialize_str(field.as_str()),
        }
    }
}

impl Cell {
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Field(field) if field.is_diagnostic())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Field(field) => f.write_str(field.as_str()),
        }
    }
}

/// A lease ready for rendering, in [`HEADERS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLease {
    pub subnet_id: i64,
    pub ip_address: Field,
    pub mac_address: Field,
    pub client_id: Field,
    pub valid_lifetime: i64,
    pub expire: String,
    pub hostname: String,
}

impl FormattedLease {
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(self.subnet_id),
            Cell::Field(self.ip_address.clone()),
            Cell::Field(self.mac_address.clone()),
            Cell::Field(self.client_id.clone()),
            Cell::Integer(self.valid_lifetime),
            Cell::Text(self.expire.clone()),
            Cell::Text(self.hostname.clone()),
        ]
    }
}

pub fn format_lease(row: &LeaseRow) -> FormattedLease {
    FormattedLease {
        subnet_id: row.subnet_id,
        ip_address: format_ip(row.address),
        mac_address: format_mac(row.hwaddr.as_deref()),
        client_id: format_client_id(row.client_id.as_deref()),
        valid_lifetime: row.valid_lifetime,
        expire: row.expire.format(EXPIRE_FORMAT).to_string(),
        hostname: row.hostname.clone().unwrap_or_default(),
    }
}

/// Format every row into cells, in [`HEADERS`] order.
pub fn format_rows(rows: &[LeaseRow]) -> Vec<Vec<Cell>> {
    rows.iter().map(|row| format_lease(row).cells()).collect()
}

/// Decode a stored integer address to dotted-quad form.
pub fn format_ip(value: i64) -> Field {
    match u32::try_from(value) {
        Ok(addr) => Field::Value(Ipv4Addr::from(addr).to_string()),
        Err(_) => Field::Diagnostic(format!("Invalid IP: {value}")),
    }
}

/// Render a hardware address in Cisco notation, `aabb.ccdd.eeff`.
pub fn format_mac(hwaddr: Option<&[u8]>) -> Field {
    let Some(bytes) = hwaddr else {
        return Field::Value(ABSENT.to_string());
    };
    if bytes.len() != 6 {
        return Field::Diagnostic(format!(
            "Error formatting MAC: expected 6 bytes, got {} ({})",
            bytes.len(),
            to_hex(bytes)
        ));
    }
    let hex = to_hex(bytes);
    Field::Value(format!("{}.{}.{}", &hex[0..4], &hex[4..8], &hex[8..12]))
}

/// Render a client identifier as `xx.xxxx.xxxx.xxxx`.
///
/// Identifiers that are not exactly seven bytes are still shown, sliced at
/// the same offsets and prefixed with `Invalid:`.
pub fn format_client_id(client_id: Option<&[u8]>) -> Field {
    let Some(bytes) = client_id else {
        return Field::Value(ABSENT.to_string());
    };
    let hex = to_hex(bytes);
    let grouped = format!(
        "{}.{}.{}.{}",
        slice(&hex, 0, 2),
        slice(&hex, 2, 6),
        slice(&hex, 6, 10),
        slice(&hex, 10, 14)
    );
    if hex.len() == CLIENT_ID_HEX_LEN {
        Field::Value(grouped)
    } else {
        Field::Diagnostic(format!("Invalid: {grouped}"))
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// Clamped to the string, so short inputs give short or empty segments.
fn slice(hex: &str, start: usize, end: usize) -> &str {
    let end = end.min(hex.len());
    let start = start.min(end);
    &hex[start..end]
}
