use std::fs;
use std::net::TcpListener;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

// Bind and drop a listener to find a local port with nothing behind it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("local addr").port()
}

fn write_config(dir: &Path, backend: &str, port: u16) -> std::path::PathBuf {
    let config = dir.join("kea-dhcp4.conf");
    fs::write(
        &config,
        format!(
            r#"{{"Dhcp4": {{"lease-database": {{
                "type": "{backend}", "host": "127.0.0.1", "port": {port},
                "name": "kea", "user": "kea", "password": "kea"
            }}}}}}"#
        ),
    )
    .expect("write config");
    config
}

#[test]
fn unreachable_mysql_fails_without_stdout() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "mysql", closed_port());

    Command::new(assert_cmd::cargo::cargo_bin!("kea-leases"))
        .arg("--config")
        .arg(path_as_str(&config))
        .arg("--output")
        .arg("json")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to connect to mysql database 'kea'"));
}

#[test]
fn unreachable_postgresql_fails_without_stdout() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "postgresql", closed_port());

    Command::new(assert_cmd::cargo::cargo_bin!("kea-leases"))
        .arg("--config")
        .arg(path_as_str(&config))
        .arg("--output")
        .arg("csv")
        .arg("--subnet-id")
        .arg("5")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to connect to postgresql database 'kea'"));
}
