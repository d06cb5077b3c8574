use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::People;

/// Display format for settlement dates, e.g. "18.10.2026".
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Metadata attached to a period when its bill is settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub payer: String,
    pub bill: f64,
    pub total_mileage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<f64>,
    #[serde(with = "settlement_date")]
    pub date: NaiveDate,
}

impl Settlement {
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A window of mileage tracking. Open until a bill settles it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Signed mileage entries per person, in recording order.
    pub entries: BTreeMap<String, Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Settlement>,
}

impl Period {
    /// Create an open period with an empty sequence for every person.
    pub fn open(people: &People) -> Self {
        Self {
            entries: people.iter().map(|p| (p.to_string(), Vec::new())).collect(),
            settlement: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.settlement.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.settlement.is_some()
    }

    /// Entries recorded for a person (empty if the person has none).
    pub fn entries_for(&self, person: &str) -> &[f64] {
        self.entries.get(person).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of a person's entries, corrections included.
    pub fn personal_mileage(&self, person: &str) -> f64 {
        self.entries_for(person).iter().fold(0.0, |acc, v| acc + v)
    }

    /// Longest entry sequence among the given people.
    pub fn max_entries(&self, people: &People) -> usize {
        people
            .iter()
            .map(|p| self.entries_for(p).len())
            .max()
            .unwrap_or(0)
    }

    pub fn push_entry(&mut self, person: &str, amount: f64) {
        self.entries
            .entry(person.to_string())
            .or_default()
            .push(amount);
    }

    /// Add an empty sequence for every person missing from this period.
    /// Returns true if anything was added.
    pub fn ensure_people(&mut self, people: &People) -> bool {
        let mut changed = false;
        for person in people.iter() {
            if !self.entries.contains_key(person) {
                self.entries.insert(person.to_string(), Vec::new());
                changed = true;
            }
        }
        changed
    }

    /// Bill amount, zero while the period is open.
    pub fn bill(&self) -> f64 {
        self.settlement.as_ref().map(|s| s.bill).unwrap_or(0.0)
    }

    /// Settled mileage, zero while the period is open.
    pub fn total_mileage(&self) -> f64 {
        self.settlement
            .as_ref()
            .map(|s| s.total_mileage)
            .unwrap_or(0.0)
    }
}

mod settlement_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
