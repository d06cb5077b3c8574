// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use logbook::application::Ledger;
use logbook::domain::{People, Units};
use logbook::storage::{JsonFileStore, SqliteStore, Store};
use tempfile::TempDir;

pub fn people() -> People {
    People::new(["Eve", "Bob"]).unwrap()
}

/// Helper to create a ledger backed by a JSON file in a temporary directory
pub async fn test_ledger() -> Result<(Ledger<Store>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let ledger = Ledger::open(
        Store::json(json_path(&temp_dir)),
        people(),
        Units::default(),
    )
    .await?;
    Ok((ledger, temp_dir))
}

/// Helper to create a ledger backed by a temporary SQLite database
pub async fn sqlite_ledger() -> Result<(Ledger<Store>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = Store::sqlite(sqlite_path(&temp_dir)).await?;
    let ledger = Ledger::open(store, people(), Units::default()).await?;
    Ok((ledger, temp_dir))
}

/// Reopen the JSON logbook in `temp_dir`, as a restarted process would
pub async fn reopen_json(temp_dir: &TempDir) -> Result<Ledger<Store>> {
    Ok(Ledger::open(
        Store::json(json_path(temp_dir)),
        people(),
        Units::default(),
    )
    .await?)
}

pub fn json_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("logbook.json")
}

pub fn sqlite_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("logbook.db")
}

pub fn json_store(temp_dir: &TempDir) -> JsonFileStore {
    JsonFileStore::new(json_path(temp_dir))
}

pub async fn sqlite_store(temp_dir: &TempDir) -> Result<SqliteStore> {
    SqliteStore::open(sqlite_path(temp_dir)).await
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}
