use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{People, Period, average_consumption};

/// Full history snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogbookSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub people: Vec<String>,
    pub periods: Vec<Period>,
}

/// Exporter for converting the period history to various formats
pub struct Exporter<'a> {
    periods: &'a [Period],
    people: &'a People,
}

impl<'a> Exporter<'a> {
    pub fn new(periods: &'a [Period], people: &'a People) -> Self {
        Self { periods, people }
    }

    /// Export one CSV row per closed period
    pub fn export_settlements_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec![
            "period".to_string(),
            "date".to_string(),
            "payer".to_string(),
            "bill".to_string(),
            "total_mileage".to_string(),
            "fuel".to_string(),
            "average_consumption".to_string(),
        ];
        header.extend(self.people.iter().map(|p| format!("{}_mileage", p)));
        csv_writer.write_record(&header)?;

        let mut count = 0;
        for (index, period) in self.periods.iter().enumerate() {
            let Some(settlement) = &period.settlement else {
                continue;
            };

            let mut record = vec![
                (index + 1).to_string(),
                settlement.date_str(),
                settlement.payer.clone(),
                settlement.bill.to_string(),
                settlement.total_mileage.to_string(),
                settlement.fuel.map(|f| f.to_string()).unwrap_or_default(),
                settlement
                    .fuel
                    .map(|f| format!("{:.2}", average_consumption(f, settlement.total_mileage)))
                    .unwrap_or_default(),
            ];
            record.extend(
                self.people
                    .iter()
                    .map(|p| period.personal_mileage(p).to_string()),
            );
            csv_writer.write_record(&record)?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export every mileage entry, one CSV row each
    pub fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["period", "status", "person", "entry", "amount"])?;

        let mut count = 0;
        for (index, period) in self.periods.iter().enumerate() {
            let status = if period.is_open() { "open" } else { "closed" };
            for person in self.people.iter() {
                for (entry, amount) in period.entries_for(person).iter().enumerate() {
                    csv_writer.write_record(&[
                        (index + 1).to_string(),
                        status.to_string(),
                        person.to_string(),
                        (entry + 1).to_string(),
                        amount.to_string(),
                    ])?;
                    count += 1;
                }
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full history as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LogbookSnapshot> {
        let snapshot = LogbookSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            people: self.people.as_slice().to_vec(),
            periods: self.periods.to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
