#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use rusqlite::Connection;
use tempfile::TempDir;

/// Two named roads meeting at a right angle plus one named point.
///
/// `1 - 2 - 3` is Hearst Avenue heading east, `3 - 4` is Euclid Avenue
/// heading south. Node 2 is named "Berkeley".
const FIXTURE_SQL: &str = r#"
    CREATE TABLE nodes (id INTEGER PRIMARY KEY, lon REAL NOT NULL, lat REAL NOT NULL);
    CREATE TABLE node_tags (node_id INTEGER NOT NULL, k TEXT NOT NULL, v TEXT NOT NULL);
    CREATE TABLE ways (id INTEGER PRIMARY KEY);
    CREATE TABLE way_nodes (way_id INTEGER NOT NULL, node_id INTEGER NOT NULL, seq INTEGER NOT NULL);
    CREATE TABLE way_tags (way_id INTEGER NOT NULL, k TEXT NOT NULL, v TEXT NOT NULL);

    INSERT INTO nodes (id, lon, lat) VALUES
        (1, -122.2600, 37.8700),
        (2, -122.2550, 37.8700),
        (3, -122.2500, 37.8700),
        (4, -122.2500, 37.8650);

    INSERT INTO node_tags (node_id, k, v) VALUES
        (2, 'name', 'Berkeley'),
        (4, 'name', 'Berkeley Bowl');

    INSERT INTO ways (id) VALUES (100), (101);
    INSERT INTO way_nodes (way_id, node_id, seq) VALUES
        (100, 1, 0), (100, 2, 1), (100, 3, 2),
        (101, 3, 0), (101, 4, 1);
    INSERT INTO way_tags (way_id, k, v) VALUES
        (100, 'highway', 'primary'),
        (100, 'name', 'Hearst Avenue'),
        (101, 'highway', 'residential'),
        (101, 'name', 'Euclid Avenue');
"#;

pub fn fixture_extract() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("map.db");
    let conn = Connection::open(&path).expect("create fixture db");
    conn.execute_batch(FIXTURE_SQL).expect("populate fixture db");
    drop(conn);
    (dir, path)
}

pub fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("bearmaps-cli");
    cmd.env("RUST_LOG", "error").env_remove("BEARMAPS_DATASET");
    cmd
}

/// CLI command pointed at a fresh fixture extract via `--data`.
pub fn prepare_command() -> (Command, TempDir) {
    let (dir, path) = fixture_extract();
    let mut cmd = cli();
    cmd.arg("--data").arg(path);
    (cmd, dir)
}
