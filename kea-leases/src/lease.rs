use chrono::{DateTime, Utc};

/// One row of the Kea `lease4` table, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseRow {
    /// IPv4 address in host-order integer form. Wider than `u32` because
    /// PostgreSQL stores it as `BIGINT`.
    pub address: i64,
    pub hwaddr: Option<Vec<u8>>,
    pub client_id: Option<Vec<u8>>,
    pub valid_lifetime: i64,
    pub expire: DateTime<Utc>,
    pub subnet_id: i64,
    pub fqdn_fwd: bool,
    pub fqdn_rev: bool,
    pub hostname: Option<String>,
}
