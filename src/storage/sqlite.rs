use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::{Period, Settlement};

use super::{LogbookStore, MIGRATION_001_INITIAL};

/// Column format for `periods.settled_on`.
const SQL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Period history kept in an SQLite database.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Open the database file at `path`, creating it if missing, and migrate.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", path.as_ref().display());
        let store = Self::connect(&database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    fn row_to_settlement(row: &sqlx::sqlite::SqliteRow) -> Result<Option<Settlement>> {
        let payer: Option<String> = row.get("payer");
        let Some(payer) = payer else {
            return Ok(None);
        };

        let bill: Option<f64> = row.get("bill");
        let total_mileage: Option<f64> = row.get("total_mileage");
        let settled_on: Option<String> = row.get("settled_on");

        Ok(Some(Settlement {
            payer,
            bill: bill.ok_or_else(|| anyhow!("Settled period without bill"))?,
            total_mileage: total_mileage
                .ok_or_else(|| anyhow!("Settled period without total mileage"))?,
            fuel: row.get("fuel"),
            date: NaiveDate::parse_from_str(
                &settled_on.ok_or_else(|| anyhow!("Settled period without date"))?,
                SQL_DATE_FORMAT,
            )
            .context("Invalid settled_on date")?,
        }))
    }

    fn period_index(position: i64, len: usize) -> Result<usize> {
        usize::try_from(position)
            .ok()
            .filter(|index| *index < len)
            .ok_or_else(|| anyhow!("Reference to unknown period {}", position))
    }
}

impl LogbookStore for SqliteStore {
    async fn load(&self) -> Result<Vec<Period>> {
        let rows = sqlx::query(
            r#"
            SELECT position, payer, bill, total_mileage, fuel, settled_on
            FROM periods
            ORDER BY position
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list periods")?;

        let mut periods = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let position: i64 = row.get("position");
            if usize::try_from(position).ok() != Some(index) {
                bail!("Gap in period history at position {}", index);
            }
            periods.push(Period {
                entries: Default::default(),
                settlement: Self::row_to_settlement(row)?,
            });
        }

        let members = sqlx::query("SELECT period_position, person FROM period_people")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list period members")?;

        for row in &members {
            let index = Self::period_index(row.get("period_position"), periods.len())?;
            let person: String = row.get("person");
            periods[index].entries.entry(person).or_default();
        }

        let entries = sqlx::query(
            r#"
            SELECT period_position, person, amount
            FROM mileage_entries
            ORDER BY period_position, person, seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list mileage entries")?;

        for row in &entries {
            let index = Self::period_index(row.get("period_position"), periods.len())?;
            let person: String = row.get("person");
            periods[index].push_entry(&person, row.get("amount"));
        }

        tracing::debug!(periods = periods.len(), entries = entries.len(), "loaded logbook");
        Ok(periods)
    }

    async fn save(&self, periods: &[Period]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        for statement in [
            "DELETE FROM mileage_entries",
            "DELETE FROM period_people",
            "DELETE FROM periods",
        ] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to run {}", statement))?;
        }

        for (position, period) in periods.iter().enumerate() {
            let position = position as i64;
            let settlement = period.settlement.as_ref();

            sqlx::query(
                r#"
                INSERT INTO periods (position, payer, bill, total_mileage, fuel, settled_on)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(position)
            .bind(settlement.map(|s| s.payer.clone()))
            .bind(settlement.map(|s| s.bill))
            .bind(settlement.map(|s| s.total_mileage))
            .bind(settlement.and_then(|s| s.fuel))
            .bind(settlement.map(|s| s.date.format(SQL_DATE_FORMAT).to_string()))
            .execute(&mut *tx)
            .await
            .context("Failed to save period")?;

            for (person, amounts) in &period.entries {
                sqlx::query("INSERT INTO period_people (period_position, person) VALUES (?, ?)")
                    .bind(position)
                    .bind(person)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to save period member")?;

                for (seq, amount) in amounts.iter().enumerate() {
                    sqlx::query(
                        r#"
                        INSERT INTO mileage_entries (period_position, person, seq, amount)
                        VALUES (?, ?, ?, ?)
                        "#,
                    )
                    .bind(position)
                    .bind(person)
                    .bind(seq as i64)
                    .bind(*amount)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to save mileage entry")?;
                }
            }
        }

        tx.commit().await.context("Failed to commit logbook")?;

        tracing::debug!(periods = periods.len(), "saved logbook");
        Ok(())
    }
}
