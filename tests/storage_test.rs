mod common;

use anyhow::Result;
use common::{json_store, parse_date, people, sqlite_ledger, sqlite_store};
use logbook::application::Ledger;
use logbook::domain::{Period, Settlement, Units};
use logbook::storage::{LogbookStore, Store};
use tempfile::TempDir;

/// Two closed periods and an open one, with ragged and empty sequences
fn sample_history() -> Vec<Period> {
    let people = people();

    let mut first = Period::open(&people);
    first.push_entry("Eve", 100.0);
    first.push_entry("Bob", 400.0);
    first.push_entry("Bob", 300.0);
    first.push_entry("Bob", -12.5);
    first.settlement = Some(Settlement {
        payer: "Bob".into(),
        bill: 100.0,
        total_mileage: 1000.0,
        fuel: None,
        date: parse_date("2024-01-15"),
    });

    let mut second = Period::open(&people);
    second.push_entry("Eve", 0.1);
    second.push_entry("Eve", 0.2);
    second.settlement = Some(Settlement {
        payer: "Eve".into(),
        bill: 33.33,
        total_mileage: 412.7,
        fuel: Some(24.05),
        date: parse_date("2024-02-29"),
    });

    let mut open = Period::open(&people);
    open.push_entry("Bob", 7.0);

    vec![first, second, open]
}

#[tokio::test]
async fn test_json_missing_file_is_empty_history() -> Result<()> {
    let temp = TempDir::new()?;
    let store = json_store(&temp);

    assert!(store.load().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_json_round_trip() -> Result<()> {
    let temp = TempDir::new()?;
    let store = json_store(&temp);
    let history = sample_history();

    store.save(&history).await?;
    assert_eq!(store.load().await?, history);

    // Saving what was loaded changes nothing
    let first = std::fs::read_to_string(store.path())?;
    store.save(&store.load().await?).await?;
    assert_eq!(std::fs::read_to_string(store.path())?, first);
    Ok(())
}

#[tokio::test]
async fn test_json_file_is_readable() -> Result<()> {
    let temp = TempDir::new()?;
    let store = json_store(&temp);
    store.save(&sample_history()).await?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(store.path())?)?;
    let periods = value.as_array().unwrap();
    assert_eq!(periods.len(), 3);
    assert_eq!(periods[0]["settlement"]["payer"], "Bob");
    assert_eq!(periods[0]["settlement"]["date"], "15.01.2024");
    assert_eq!(periods[0]["entries"]["Bob"].as_array().unwrap().len(), 3);
    assert!(periods[2].get("settlement").is_none());
    assert_eq!(periods[2]["entries"]["Eve"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn test_json_rejects_corrupt_file() -> Result<()> {
    let temp = TempDir::new()?;
    let store = json_store(&temp);
    std::fs::write(store.path(), "{ not json")?;

    assert!(store.load().await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_json_failed_replace_removes_temp_file() -> Result<()> {
    let temp = TempDir::new()?;
    let store = json_store(&temp);

    // A non-empty directory where the logbook should be cannot be replaced
    std::fs::create_dir(store.path())?;
    std::fs::write(store.path().join("keep"), "x")?;

    assert!(store.save(&sample_history()).await.is_err());
    assert!(!temp.path().join("logbook.json.tmp").exists());
    Ok(())
}

#[tokio::test]
async fn test_sqlite_empty_database_is_empty_history() -> Result<()> {
    let temp = TempDir::new()?;
    let store = sqlite_store(&temp).await?;

    assert!(store.load().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sqlite_round_trip() -> Result<()> {
    let temp = TempDir::new()?;
    let store = sqlite_store(&temp).await?;
    let history = sample_history();

    store.save(&history).await?;
    assert_eq!(store.load().await?, history);

    // A shorter history fully replaces the longer one
    let shorter = history[2..].to_vec();
    store.save(&shorter).await?;
    assert_eq!(store.load().await?, shorter);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_reopen_keeps_history() -> Result<()> {
    let temp = TempDir::new()?;
    let history = sample_history();

    {
        let store = sqlite_store(&temp).await?;
        store.save(&history).await?;
    }

    let store = sqlite_store(&temp).await?;
    assert_eq!(store.load().await?, history);
    Ok(())
}

#[tokio::test]
async fn test_ledger_on_sqlite() -> Result<()> {
    let (mut ledger, temp) = sqlite_ledger().await?;

    ledger.record_mileage("Eve", 100.0).await?;
    ledger.record_mileage("Bob", 400.0).await?;
    ledger.record_mileage("Bob", 300.0).await?;
    let report = ledger
        .settle_bill_on(parse_date("2024-01-15"), "Bob", 1000.0, 100.0, None)
        .await?;
    assert_eq!(report.to_string(), "Eve owes Bob 20.00 EUR");
    let history = ledger.history().to_vec();
    drop(ledger);

    let store = Store::sqlite(common::sqlite_path(&temp)).await?;
    let reopened = Ledger::open(store, people(), Units::default()).await?;
    assert_eq!(reopened.history(), history.as_slice());
    assert_eq!(reopened.aggregate_totals_view(), "Total: 1000 km and 100 EUR");
    Ok(())
}

#[tokio::test]
async fn test_stores_are_interchangeable() -> Result<()> {
    let temp = TempDir::new()?;
    let json = json_store(&temp);
    let sqlite = sqlite_store(&temp).await?;

    json.save(&sample_history()).await?;
    sqlite.save(&json.load().await?).await?;
    assert_eq!(sqlite.load().await?, json.load().await?);
    Ok(())
}

#[tokio::test]
async fn test_closed_tail_is_repaired_on_open() -> Result<()> {
    let temp = TempDir::new()?;
    let store = json_store(&temp);
    let closed_only = sample_history()[..2].to_vec();
    store.save(&closed_only).await?;

    let ledger = Ledger::open(Store::json(store.path()), people(), Units::default()).await?;
    assert_eq!(ledger.history().len(), 3);
    assert!(ledger.current_period().is_open());

    // The repaired history was written back
    assert_eq!(store.load().await?.len(), 3);
    Ok(())
}
