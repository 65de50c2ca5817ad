//! Reporting on Kea DHCPv4 leases stored in a SQL lease database.
//!
//! One invocation is one pipeline:
//!
//! 1. [`filter`] — normalize the subnet / IP / MAC filters
//! 2. `kea_conf` — resolve the lease database from the Kea configuration
//! 3. [`repository`] — run one parameterized SELECT against `lease4`
//! 4. [`format`] — turn stored values into display text
//! 5. [`render`] — write a table, JSON or CSV
//!
//! ```ignore
//! use kea_leases::filter::FilterSet;
//! use kea_leases::format::{format_rows, HEADERS};
//! use kea_leases::render::{renderer_for, Format};
//! use kea_leases::repository::fetch_leases;
//!
//! let filters = FilterSet::from_args(Some(1), None, Some("aa:bb:cc:dd:ee:ff"))?;
//! let db = kea_conf::load_file("/etc/kea/kea-dhcp4.conf".as_ref())?.lease_database()?;
//! let rows = fetch_leases(&db, &filters)?;
//! renderer_for(Format::Json, false).render(&HEADERS, &format_rows(&rows), &mut std::io::stdout())?;
//! ```

pub mod filter;
pub mod format;
pub mod lease;
pub mod render;
pub mod repository;
