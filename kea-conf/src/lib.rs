//! Loading of Kea DHCP server configuration files.
//!
//! Kea configuration is JSON with two extensions handled here before the
//! document reaches `serde_json`:
//!
//! - [`include`] — `<?include "path"?>` markers, substituted textually in one
//!   non-recursive pass
//! - [`comments`] — `#`, `//` and `/* */` comments
//!
//! [`lease_db`] then extracts the `Dhcp4.lease-database` connection settings.
//!
//! ```no_run
//! let loaded = kea_conf::load_file("/etc/kea/kea-dhcp4.conf".as_ref())?;
//! for warning in &loaded.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! let db = loaded.lease_database()?;
//! println!("{} on {}:{}", db.name, db.host, db.port_or_default());
//! # Ok::<(), kea_conf::ConfigError>(())
//! ```

pub mod comments;
pub mod error;
pub mod include;
pub mod lease_db;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

pub use comments::strip_comments;
pub use error::ConfigError;
pub use include::{expand_includes, Expanded};
pub use lease_db::{lease_database, Backend, LeaseDatabase, DEFAULT_HOST};

/// A parsed configuration document and the non-fatal problems met on the way.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub document: Value,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    pub fn lease_database(&self) -> Result<LeaseDatabase, ConfigError> {
        lease_database(&self.document)
    }
}

/// Read, expand and parse the configuration file at `path`.
pub fn load_file(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_str(&raw, path, base_dir)
}

/// Expand and parse configuration text; `path` is only used in error messages.
pub fn parse_str(raw: &str, path: &Path, base_dir: &Path) -> Result<LoadedConfig, ConfigError> {
    // Stripped before expansion so commented-out include markers stay inert.
    let expanded = expand_includes(&strip_comments(raw), base_dir);

    let document = serde_json::from_str(&expanded.text).map_err(|err| ConfigError::Json {
        path: path.to_path_buf(),
        line: err.line(),
        column: err.column(),
        message: without_position(&err),
    })?;

    Ok(LoadedConfig {
        path: path.to_path_buf(),
        document,
        warnings: expanded.warnings,
    })
}

// serde_json appends " at line L column C", which `ConfigError::Json` prints itself.
fn without_position(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match full.strip_suffix(&suffix) {
        Some(message) => message.to_string(),
        None => full,
    }
}
