mod common;

use anyhow::Result;
use common::test_ledger;
use logbook::application::{Command, LedgerError, ParseError, parse_command};

#[tokio::test]
async fn test_single_number_records_mileage() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;

    let reply = ledger.handle_message("Eve", "50").await;
    assert_eq!(reply, "Eve has driven 50 km");

    let reply = ledger.handle_message("Eve", "-20").await;
    assert_eq!(reply, "Eve has driven -20 km");

    assert_eq!(ledger.current_period().entries_for("Eve"), &[50.0, -20.0]);
    Ok(())
}

#[tokio::test]
async fn test_two_numbers_settle_bill() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;

    ledger.handle_message("Eve", "100").await;
    ledger.handle_message("Bob", "400").await;
    ledger.handle_message("Bob", "300").await;

    let reply = ledger.handle_message("Bob", "1000 100").await;
    assert_eq!(reply, "Eve owes Bob 20.00 EUR");
    assert_eq!(ledger.history().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_three_numbers_settle_with_fuel() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;

    ledger.handle_message("Eve", "300").await;
    let reply = ledger.handle_message("Bob", "400 35 24").await;

    assert!(reply.contains("Eve owes Bob"));
    assert!(reply.ends_with("Average consumption: 6.00 l/100 km"));
    let settlement = ledger.history()[0].settlement.as_ref().unwrap();
    assert_eq!(settlement.fuel, Some(24.0));
    Ok(())
}

#[tokio::test]
async fn test_malformed_message_changes_nothing() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;
    let before = ledger.history().to_vec();

    assert_eq!(
        ledger.handle_message("Eve", "12.5").await,
        "All arguments must be numbers."
    );
    assert_eq!(
        ledger.handle_message("Eve", "").await,
        "There must be at least one number."
    );
    assert_eq!(
        ledger.handle_message("Eve", "1 2 3 4").await,
        "Too many numbers: expected at most 3, got 4."
    );

    assert_eq!(ledger.history(), before.as_slice());
    Ok(())
}

#[tokio::test]
async fn test_rejected_settlement_becomes_reply_text() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;

    let reply = ledger.handle_message("Bob", "0 50").await;
    assert!(reply.starts_with("Invalid argument:"), "{reply}");

    let reply = ledger.handle_message("Mallory", "10").await;
    assert_eq!(reply, "Unknown person: Mallory");

    assert_eq!(ledger.history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unsaved_settlement_reply_keeps_debts() -> Result<()> {
    let (mut ledger, temp) = test_ledger().await?;
    ledger.handle_message("Eve", "100").await;
    ledger.handle_message("Bob", "700").await;

    std::fs::remove_dir_all(temp.path())?;

    let reply = ledger.handle_message("Bob", "1000 100").await;
    assert!(reply.starts_with("Eve owes Bob 20.00 EUR\n"), "{reply}");
    assert!(reply.contains("could not be saved"), "{reply}");
    assert_eq!(ledger.history().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_irregular_spacing_is_malformed() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;

    assert_eq!(
        ledger.handle_message("Bob", "1000  100").await,
        "All arguments must be numbers."
    );
    assert_eq!(ledger.history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_apply_reports_malformed_as_invalid_argument() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;

    let command = parse_command("ten");
    assert_eq!(
        command,
        Command::Malformed {
            reason: ParseError::NotANumber
        }
    );

    let err = ledger.apply("Eve", &command).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
    Ok(())
}

#[tokio::test]
async fn test_preview_uses_configured_units() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let preview = parse_command("600 60").preview(ledger.units());
    assert_eq!(preview, "Distance: 600 km\nPrice: 60 EUR\nFuel: - l");
    Ok(())
}
