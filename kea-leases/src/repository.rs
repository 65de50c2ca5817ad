//! Read-only access to the Kea `lease4` table.

use kea_conf::{Backend, LeaseDatabase};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::Row as _;
use sqlx::{ConnectOptions, Connection};
use thiserror::Error;
use tracing::debug;

use crate::filter::FilterSet;
use crate::lease::LeaseRow;

pub const LEASE_TABLE: &str = "lease4";

pub const LEASE_COLUMNS: [&str; 9] = [
    "address",
    "hwaddr",
    "client_id",
    "valid_lifetime",
    "expire",
    "subnet_id",
    "fqdn_fwd",
    "fqdn_rev",
    "hostname",
];

/// Errors returned while querying the lease database.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to start database runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to connect to {backend} database '{name}' on {host}:{port}: {source}")]
    Connect {
        backend: Backend,
        host: String,
        port: u16,
        name: String,
        source: sqlx::Error,
    },
    #[error("lease query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("failed to close database connection: {0}")]
    Close(#[source] sqlx::Error),
    #[error("failed to decode column '{column}': {source}")]
    Decode {
        column: &'static str,
        source: sqlx::Error,
    },
}

/// Placeholder syntax of the target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?`
    Mysql,
    /// `$1`, `$2`, ...
    Postgres,
}

impl From<Backend> for Dialect {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Mysql => Self::Mysql,
            Backend::Postgresql => Self::Postgres,
        }
    }
}

/// A value bound to one filter placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    SubnetId(u32),
    Address(u32),
    HwAddr(Vec<u8>),
}

/// The SELECT statement for a filter set, with its bind values in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

impl LeaseQuery {
    pub fn build(filters: &FilterSet, dialect: Dialect) -> Self {
        let mut sql = format!(
            "SELECT {} FROM {LEASE_TABLE} WHERE 1=1",
            LEASE_COLUMNS.join(", ")
        );
        let mut params = Vec::new();

        let mut push = |column: &str, param: Param| {
            params.push(param);
            let placeholder = match dialect {
                Dialect::Mysql => "?".to_string(),
                Dialect::Postgres => format!("${}", params.len()),
            };
            sql.push_str(&format!(" AND {column} = {placeholder}"));
        };

        if let Some(subnet_id) = filters.subnet_id {
            push("subnet_id", Param::SubnetId(subnet_id));
        }
        if let Some(address) = filters.address {
            push("address", Param::Address(address));
        }
        if let Some(hwaddr) = filters.hwaddr {
            push("hwaddr", Param::HwAddr(hwaddr.to_vec()));
        }

        Self { sql, params }
    }
}

/// Run one filtered query against the lease database and return every row.
///
/// A fresh connection is opened for the call and closed before returning,
/// whether or not the query succeeded.
pub fn fetch_leases(
    db: &LeaseDatabase,
    filters: &FilterSet,
) -> Result<Vec<LeaseRow>, RepositoryError> {
    let query = LeaseQuery::build(filters, db.backend.into());
    debug!(sql = %query.sql, params = ?query.params, "lease query");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(RepositoryError::Runtime)?;

    let rows = runtime.block_on(async {
        match db.backend {
            Backend::Mysql => fetch_mysql(db, &query).await,
            Backend::Postgresql => fetch_postgres(db, &query).await,
        }
    })?;
    debug!(rows = rows.len(), "fetched leases");
    Ok(rows)
}

fn connect_error(db: &LeaseDatabase, source: sqlx::Error) -> RepositoryError {
    RepositoryError::Connect {
        backend: db.backend,
        host: db.host.clone(),
        port: db.port_or_default(),
        name: db.name.clone(),
        source,
    }
}

async fn fetch_mysql(
    db: &LeaseDatabase,
    query: &LeaseQuery,
) -> Result<Vec<LeaseRow>, RepositoryError> {
    let mut conn: MySqlConnection = MySqlConnectOptions::new()
        .host(&db.host)
        .port(db.port_or_default())
        .username(&db.user)
        .password(&db.password)
        .database(&db.name)
        .connect()
        .await
        .map_err(|err| connect_error(db, err))?;

    let mut statement = sqlx::query(&query.sql);
    for param in &query.params {
        statement = match param {
            Param::SubnetId(value) | Param::Address(value) => statement.bind(*value),
            Param::HwAddr(bytes) => statement.bind(bytes.as_slice()),
        };
    }

    let fetched = statement.fetch_all(&mut conn).await;
    let closed = conn.close().await;
    let rows = fetched.map_err(RepositoryError::Query)?;
    closed.map_err(RepositoryError::Close)?;

    rows.iter().map(decode_mysql).collect()
}

async fn fetch_postgres(
    db: &LeaseDatabase,
    query: &LeaseQuery,
) -> Result<Vec<LeaseRow>, RepositoryError> {
    let mut conn: PgConnection = PgConnectOptions::new()
        .host(&db.host)
        .port(db.port_or_default())
        .username(&db.user)
        .password(&db.password)
        .database(&db.name)
        .connect()
        .await
        .map_err(|err| connect_error(db, err))?;

    // Integer columns are BIGINT in the PostgreSQL schema.
    let mut statement = sqlx::query(&query.sql);
    for param in &query.params {
        statement = match param {
            Param::SubnetId(value) | Param::Address(value) => statement.bind(i64::from(*value)),
            Param::HwAddr(bytes) => statement.bind(bytes.as_slice()),
        };
    }

    let fetched = statement.fetch_all(&mut conn).await;
    let closed = conn.close().await;
    let rows = fetched.map_err(RepositoryError::Query)?;
    closed.map_err(RepositoryError::Close)?;

    rows.iter().map(decode_postgres).collect()
}

macro_rules! column {
    ($row:expr, $name:literal) => {
        $row.try_get($name)
            .map_err(|source| RepositoryError::Decode {
                column: $name,
                source,
            })?
    };
}

fn decode_mysql(row: &MySqlRow) -> Result<LeaseRow, RepositoryError> {
    let address: u32 = column!(row, "address");
    let valid_lifetime: u32 = column!(row, "valid_lifetime");
    let subnet_id: u32 = column!(row, "subnet_id");
    Ok(LeaseRow {
        address: i64::from(address),
        hwaddr: column!(row, "hwaddr"),
        client_id: column!(row, "client_id"),
        valid_lifetime: i64::from(valid_lifetime),
        expire: column!(row, "expire"),
        subnet_id: i64::from(subnet_id),
        fqdn_fwd: column!(row, "fqdn_fwd"),
        fqdn_rev: column!(row, "fqdn_rev"),
        hostname: column!(row, "hostname"),
    })
}

fn decode_postgres(row: &PgRow) -> Result<LeaseRow, RepositoryError> {
    Ok(LeaseRow {
        address: column!(row, "address"),
        hwaddr: column!(row, "hwaddr"),
        client_id: column!(row, "client_id"),
        valid_lifetime: column!(row, "valid_lifetime"),
        expire: column!(row, "expire"),
        subnet_id: column!(row, "subnet_id"),
        fqdn_fwd: column!(row, "fqdn_fwd"),
        fqdn_rev: column!(row, "fqdn_rev"),
        hostname: column!(row, "hostname"),
    })
}

#[cfg(test)]
mod tests {
    use super::{Dialect, LeaseQuery, Param, RepositoryError};
    use crate::filter::FilterSet;
    use pretty_assertions::assert_eq;

    const BASE: &str = "SELECT address, hwaddr, client_id, valid_lifetime, expire, \
        subnet_id, fqdn_fwd, fqdn_rev, hostname FROM lease4 WHERE 1=1";

    #[test]
    fn no_filters_selects_everything() {
        let query = LeaseQuery::build(&FilterSet::default(), Dialect::Mysql);
        assert_eq!(query.sql, BASE);
        assert!(query.params.is_empty());
    }

    #[test]
    fn subnet_filter_adds_exactly_one_clause() {
        let filters = FilterSet {
            subnet_id: Some(5),
            ..FilterSet::default()
        };
        let query = LeaseQuery::build(&filters, Dialect::Mysql);

        assert_eq!(query.sql.matches("subnet_id = ?").count(), 1);
        assert!(!query.sql.contains("address ="));
        assert!(!query.sql.contains("hwaddr ="));
        assert_eq!(query.params, vec![Param::SubnetId(5)]);
    }

    #[test]
    fn all_filters_bind_in_order() {
        let filters = FilterSet {
            subnet_id: Some(1),
            address: Some(0x0A00_0001),
            hwaddr: Some([1, 2, 3, 4, 5, 6]),
        };
        let query = LeaseQuery::build(&filters, Dialect::Mysql);

        assert_eq!(
            query.sql,
            format!("{BASE} AND subnet_id = ? AND address = ? AND hwaddr = ?")
        );
        assert_eq!(
            query.params,
            vec![
                Param::SubnetId(1),
                Param::Address(0x0A00_0001),
                Param::HwAddr(vec![1, 2, 3, 4, 5, 6]),
            ]
        );
    }

    #[test]
    fn postgres_placeholders_are_numbered() {
        let filters = FilterSet {
            subnet_id: None,
            address: Some(7),
            hwaddr: Some([0; 6]),
        };
        let query = LeaseQuery::build(&filters, Dialect::Postgres);

        assert_eq!(
            query.sql,
            format!("{BASE} AND address = $1 AND hwaddr = $2")
        );
    }

    #[test]
    fn close_failure_is_not_reported_as_query_failure() {
        let err = RepositoryError::Close(sqlx::Error::PoolClosed);
        assert!(matches!(err, RepositoryError::Close(_)));
        assert!(err.to_string().starts_with("failed to close database connection"));
        assert!(!err.to_string().contains("lease query failed"));
    }

    #[test]
    fn filter_values_never_appear_in_sql() {
        let filters = FilterSet {
            subnet_id: Some(424242),
            address: Some(0xC0A8_0101),
            hwaddr: None,
        };
        let query = LeaseQuery::build(&filters, Dialect::Mysql);
        assert!(!query.sql.contains("424242"));
        assert!(!query.sql.contains(&0xC0A8_0101u32.to_string()));
    }
}
