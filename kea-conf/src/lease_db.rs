use std::fmt;

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Host used when `lease-database` does not name one.
pub const DEFAULT_HOST: &str = "localhost";

const SECTION: &str = "Dhcp4";
const LEASE_DATABASE: &str = "lease-database";

/// SQL backend holding the lease table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mysql,
    Postgresql,
}

impl Backend {
    /// Map a Kea `type` value to a backend.
    pub fn from_kea_type(raw: &str) -> Result<Self, ConfigError> {
        match raw.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::Mysql),
            "postgresql" | "postgres" => Ok(Self::Postgresql),
            _ => Err(ConfigError::UnsupportedBackend(raw.to_string())),
        }
    }

    pub const fn default_port(self) -> u16 {
        match self {
            Self::Mysql => 3306,
            Self::Postgresql => 5432,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mysql => f.write_str("mysql"),
            Self::Postgresql => f.write_str("postgresql"),
        }
    }
}

/// Connection parameters for the lease database.
#[derive(Clone, PartialEq, Eq)]
pub struct LeaseDatabase {
    pub backend: Backend,
    pub host: String,
    pub port: Option<u16>,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl LeaseDatabase {
    /// Configured port, or the backend's well-known port.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or_else(|| self.backend.default_port())
    }
}

// Keeps the password out of logs.
impl fmt::Debug for LeaseDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaseDatabase")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Extract `Dhcp4.lease-database` from a parsed configuration document.
///
/// When the entry is a list, the first element is used. `host` defaults to
/// [`DEFAULT_HOST`] and `type` to MySQL; `name`, `user` and `password` are
/// required.
pub fn lease_database(doc: &Value) -> Result<LeaseDatabase, ConfigError> {
    let section = doc.get(SECTION).ok_or_else(|| missing(SECTION))?;
    let entry = section
        .get(LEASE_DATABASE)
        .ok_or_else(|| missing(&key_path(LEASE_DATABASE)))?;
    let entry = match entry {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| missing(&format!("{}[0]", key_path(LEASE_DATABASE))))?,
        other => other,
    };
    let entry = entry.as_object().ok_or_else(|| ConfigError::InvalidValue {
        key: key_path(LEASE_DATABASE),
        expected: "an object",
    })?;

    let backend = match optional_str(entry, "type")? {
        Some(raw) => Backend::from_kea_type(raw)?,
        None => Backend::Mysql,
    };

    Ok(LeaseDatabase {
        backend,
        host: optional_str(entry, "host")?
            .unwrap_or(DEFAULT_HOST)
            .to_string(),
        port: optional_port(entry)?,
        name: required_str(entry, "name")?.to_string(),
        user: required_str(entry, "user")?.to_string(),
        password: required_str(entry, "password")?.to_string(),
    })
}

fn key_path(key: &str) -> String {
    if key == LEASE_DATABASE {
        format!("{SECTION}.{LEASE_DATABASE}")
    } else {
        format!("{SECTION}.{LEASE_DATABASE}.{key}")
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingKey {
        key: key.to_string(),
    }
}

fn required_str<'a>(entry: &'a Map<String, Value>, key: &str) -> Result<&'a str, ConfigError> {
    optional_str(entry, key)?.ok_or_else(|| missing(&key_path(key)))
}

fn optional_str<'a>(
    entry: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, ConfigError> {
    match entry.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ConfigError::InvalidValue {
            key: key_path(key),
            expected: "a string",
        }),
    }
}

fn optional_port(entry: &Map<String, Value>) -> Result<Option<u16>, ConfigError> {
    match entry.get("port") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|port| u16::try_from(port).ok())
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key_path("port"),
                expected: "a port number",
            }),
    }
}
