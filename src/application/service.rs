use chrono::{Local, NaiveDate};

use crate::domain::{
    Logbook, People, Period, Settlement, Units, allocate, average_consumption,
};
use crate::storage::LogbookStore;

use super::{
    Command, Debt, LedgerError, SettlementReport, parse_command, render_period_table,
    render_totals,
};

/// The mileage ledger: period history plus the store it is persisted to.
///
/// Every mutating operation changes the in-memory history first and then
/// writes the whole history. If the write fails the change stays in memory
/// and the caller gets [`LedgerError::Persistence`] (or
/// [`LedgerError::UnsavedSettlement`] for a settlement); [`Ledger::save`]
/// retries the write without repeating the operation.
///
/// Operations take `&mut self` and are not synchronised; a concurrent host
/// must serialise calls behind a single lock.
pub struct Ledger<S> {
    store: S,
    people: People,
    units: Units,
    logbook: Logbook,
}

impl<S: LogbookStore> Ledger<S> {
    /// Load the history from `store`, opening a first period on first run.
    pub async fn open(store: S, people: People, units: Units) -> Result<Self, LedgerError> {
        let stored = store.load().await?;
        let first_run = stored.is_empty();
        let (logbook, repaired) = Logbook::restore(stored, &people);

        let ledger = Self {
            store,
            people,
            units,
            logbook,
        };

        if repaired {
            if first_run {
                tracing::info!("starting a new logbook");
            } else {
                tracing::info!("repaired stored logbook");
            }
            ledger.save().await?;
        }

        tracing::debug!(
            periods = ledger.logbook.periods().len(),
            people = ledger.people.len(),
            "ledger ready"
        );
        Ok(ledger)
    }

    pub fn people(&self) -> &People {
        &self.people
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    /// All periods, oldest first; the last one is open.
    pub fn history(&self) -> &[Period] {
        self.logbook.periods()
    }

    pub fn current_period(&self) -> &Period {
        self.logbook.current()
    }

    /// Append a signed mileage entry for `person` to the current period.
    pub async fn record_mileage(&mut self, person: &str, amount: f64) -> Result<(), LedgerError> {
        self.check_person(person)?;
        if !amount.is_finite() {
            return Err(LedgerError::invalid_argument(format!(
                "mileage must be a finite number, got {}",
                amount
            )));
        }

        self.logbook.record(person, amount);
        tracing::info!(person, amount, "recorded mileage");

        self.save().await
    }

    /// Settle a bill dated today. See [`Ledger::settle_bill_on`].
    pub async fn settle_bill(
        &mut self,
        payer: &str,
        total_mileage: f64,
        bill: f64,
        fuel: Option<f64>,
    ) -> Result<SettlementReport, LedgerError> {
        let today = Local::now().date_naive();
        self.settle_bill_on(today, payer, total_mileage, bill, fuel)
            .await
    }

    /// Split `bill` across the current period's mileage, close the period and
    /// open a new one.
    pub async fn settle_bill_on(
        &mut self,
        date: NaiveDate,
        payer: &str,
        total_mileage: f64,
        bill: f64,
        fuel: Option<f64>,
    ) -> Result<SettlementReport, LedgerError> {
        self.check_person(payer)?;
        if !(total_mileage.is_finite() && total_mileage > 0.0) {
            return Err(LedgerError::invalid_argument(format!(
                "total mileage must be positive, got {}",
                total_mileage
            )));
        }
        if !(bill.is_finite() && bill >= 0.0) {
            return Err(LedgerError::invalid_argument(format!(
                "bill must not be negative, got {}",
                bill
            )));
        }
        if let Some(fuel) = fuel {
            if !(fuel.is_finite() && fuel >= 0.0) {
                return Err(LedgerError::invalid_argument(format!(
                    "fuel must not be negative, got {}",
                    fuel
                )));
            }
        }

        let allocation = allocate(self.logbook.current(), &self.people, total_mileage, bill);
        let debts = allocation
            .shares
            .iter()
            .filter(|share| share.person != payer)
            .map(|share| Debt {
                debtor: share.person.clone(),
                creditor: payer.to_string(),
                amount: share.cost,
            })
            .collect();

        let report = SettlementReport {
            allocation,
            debts,
            average_consumption: fuel.map(|f| average_consumption(f, total_mileage)),
            units: self.units.clone(),
        };

        let settlement = Settlement {
            payer: payer.to_string(),
            bill,
            total_mileage,
            fuel,
            date,
        };
        self.logbook.close_current(settlement, &self.people);
        tracing::info!(
            payer,
            bill,
            total_mileage,
            neutral_mileage = report.allocation.neutral_mileage,
            "settled bill"
        );

        match self.store.save(self.logbook.periods()).await {
            Ok(()) => Ok(report),
            Err(source) => Err(LedgerError::UnsavedSettlement {
                report: Box::new(report),
                source,
            }),
        }
    }

    /// Throw away the current period and start an empty one.
    pub async fn reset_current_period(&mut self) -> Result<(), LedgerError> {
        let dropped = self
            .people
            .iter()
            .map(|p| self.logbook.current().entries_for(p).len())
            .sum::<usize>();

        self.logbook.reset_current(&self.people);
        tracing::info!(dropped_entries = dropped, "reset current period");

        self.save().await
    }

    /// Grid of the current period's entries with a totals row.
    pub fn current_period_view(&self) -> String {
        render_period_table(self.logbook.current(), &self.people)
    }

    /// "Total: <mileage> <distance> and <cost> <currency>" over all periods.
    pub fn aggregate_totals_view(&self) -> String {
        render_totals(&self.logbook.totals(), &self.units)
    }

    /// Parse a chat message from `person` and apply it, returning the reply.
    ///
    /// Errors are turned into reply text; nothing is retried.
    pub async fn handle_message(&mut self, person: &str, text: &str) -> String {
        let command = parse_command(text);
        if let Command::Malformed { reason } = &command {
            return reason.to_string();
        }

        match self.apply(person, &command).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(person, error = %err, "message rejected");
                match err.unsaved_report() {
                    Some(report) => format!(
                        "{}\nWarning: this settlement could not be saved and may be lost on restart.",
                        report
                    ),
                    None => err.to_string(),
                }
            }
        }
    }

    /// Apply a parsed command on behalf of `person`.
    pub async fn apply(&mut self, person: &str, command: &Command) -> Result<String, LedgerError> {
        match command {
            Command::RecordMileage { amount } => {
                self.record_mileage(person, *amount as f64).await?;
                Ok(format!(
                    "{} has driven {} {}",
                    person, amount, self.units.distance
                ))
            }
            Command::SettleBill {
                mileage,
                bill,
                fuel,
            } => {
                let report = self
                    .settle_bill(
                        person,
                        *mileage as f64,
                        *bill as f64,
                        fuel.map(|f| f as f64),
                    )
                    .await?;
                Ok(report.to_string())
            }
            Command::Malformed { reason } => Err(LedgerError::invalid_argument(reason.to_string())),
        }
    }

    fn check_person(&self, person: &str) -> Result<(), LedgerError> {
        if self.people.contains(person) {
            Ok(())
        } else {
            Err(LedgerError::InvalidPerson(person.to_string()))
        }
    }

    /// Write the whole in-memory history to the store.
    ///
    /// Retries a write that failed after a mutation without applying the
    /// mutation again.
    pub async fn save(&self) -> Result<(), LedgerError> {
        self.store.save(self.logbook.periods()).await?;
        Ok(())
    }
}
