use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{Ledger, LedgerError, parse_command};
use crate::domain::{People, Units, average_consumption, format_money, format_quantity};
use crate::storage::{LogbookStore, Store};

/// Logbook - shared car mileage and fuel bill splitting
#[derive(Parser)]
#[command(name = "logbook")]
#[command(about = "Track who drove the shared car and split fuel bills by distance")]
#[command(version)]
pub struct Cli {
    /// Logbook file path
    #[arg(short, long, env = "LOGBOOK_PATH", default_value = "logbook.json")]
    pub logbook: PathBuf,

    /// Storage backend for the logbook file
    #[arg(long, value_enum, env = "LOGBOOK_STORE", default_value_t = StoreKind::Json)]
    pub store: StoreKind,

    /// People sharing the car, in column order (e.g. "Eve,Bob")
    #[arg(
        short,
        long,
        env = "LOGBOOK_PEOPLE",
        value_delimiter = ',',
        required = true
    )]
    pub people: Vec<String>,

    /// Currency label
    #[arg(long, env = "LOGBOOK_CURRENCY", default_value = "EUR")]
    pub currency: String,

    /// Distance unit label
    #[arg(long, env = "LOGBOOK_DISTANCE_UNIT", default_value = "km")]
    pub distance_unit: String,

    /// Fuel volume unit label
    #[arg(long, env = "LOGBOOK_VOLUME_UNIT", default_value = "l")]
    pub volume_unit: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Pretty-printed JSON file
    Json,
    /// SQLite database
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// One CSV row per settled bill
    Settlements,
    /// One CSV row per mileage entry
    Entries,
    /// Full history as JSON
    Full,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the logbook if it does not exist yet
    Init,

    /// Record distance driven by a person (negative values correct mistakes)
    Drive {
        /// Person who drove
        person: String,

        /// Distance driven
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Split a bill across the current period and start a new one
    Settle {
        /// Person who paid the bill
        payer: String,

        /// Odometer distance since the last settlement
        mileage: f64,

        /// Bill amount
        bill: f64,

        /// Fuel volume bought
        #[arg(short, long)]
        fuel: Option<f64>,
    },

    /// Delete the current period and all its entries
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show the current period table and overall totals
    Show,

    /// Show total mileage and cost over all periods
    Totals,

    /// List settled periods
    History,

    /// Export the history to CSV or JSON
    Export {
        /// What to export
        #[arg(value_enum)]
        export_type: ExportKind,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Handle a chat message the way the bot does ("50", "600 60", "400 35 24")
    Message {
        /// Person who sent the message
        person: String,

        /// Message text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 1..)]
        text: Vec<String>,

        /// Only show the confirmation preview
        #[arg(long)]
        preview: bool,
    },
}

impl Cli {
    fn units(&self) -> Units {
        Units::new(&self.currency, &self.distance_unit, &self.volume_unit)
    }

    async fn open_store(&self) -> Result<Store> {
        match self.store {
            StoreKind::Json => Ok(Store::json(&self.logbook)),
            StoreKind::Sqlite => Store::sqlite(&self.logbook)
                .await
                .with_context(|| format!("Failed to open {}", self.logbook.display())),
        }
    }

    pub async fn run(self) -> Result<()> {
        let people = People::new(self.people.iter().cloned())
            .map_err(LedgerError::from)
            .context("Invalid --people")?;
        let units = self.units();
        let store = self.open_store().await?;
        let mut ledger = Ledger::open(store, people, units).await?;

        match self.command {
            Commands::Init => {
                println!(
                    "Logbook ready: {} ({} period(s))",
                    self.logbook.display(),
                    ledger.history().len()
                );
            }

            Commands::Drive { person, amount } => {
                ledger.record_mileage(&person, amount).await?;
                println!(
                    "{} has driven {} {}",
                    person,
                    format_quantity(amount),
                    ledger.units().distance
                );
            }

            Commands::Settle {
                payer,
                mileage,
                bill,
                fuel,
            } => {
                let result = ledger.settle_bill(&payer, mileage, bill, fuel).await;
                let report = match &result {
                    Ok(report) => Some(report),
                    Err(err) => err.unsaved_report(),
                };
                if let Some(report) = report {
                    let text = report.to_string();
                    if text.is_empty() {
                        println!("Settled. Nobody owes {} anything.", payer);
                    } else {
                        println!("{}", text);
                    }
                }
                result?;
            }

            Commands::Reset { yes } => {
                if !yes {
                    anyhow::bail!(
                        "Resetting deletes every entry of the current period. Re-run with --yes to confirm."
                    );
                }
                ledger.reset_current_period().await?;
                println!("Current period removed.");
            }

            Commands::Show => {
                println!("{}", ledger.current_period_view());
                println!("{}", ledger.aggregate_totals_view());
            }

            Commands::Totals => {
                println!("{}", ledger.aggregate_totals_view());
            }

            Commands::History => run_history_command(&ledger),

            Commands::Export {
                export_type,
                output,
            } => run_export_command(&ledger, export_type, output)?,

            Commands::Message {
                person,
                text,
                preview,
            } => {
                let text = text.join(" ");
                if preview {
                    println!("{}", parse_command(&text).preview(ledger.units()));
                } else {
                    println!("{}", ledger.handle_message(&person, &text).await);
                }
            }
        }

        Ok(())
    }
}

fn run_history_command<S: LogbookStore>(ledger: &Ledger<S>) {
    let units = ledger.units();
    let settled: Vec<_> = ledger
        .history()
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.settlement.as_ref().map(|s| (i + 1, s)))
        .collect();

    if settled.is_empty() {
        println!("No settled periods yet.");
        return;
    }

    println!(
        "{:<4} {:<12} {:<12} {:>12} {:>12} {:>10} {:>12}",
        "#", "DATE", "PAYER", "BILL", "MILEAGE", "FUEL", "AVG/100"
    );
    println!("{}", "-".repeat(80));
    for (number, settlement) in settled {
        println!(
            "{:<4} {:<12} {:<12} {:>12} {:>12} {:>10} {:>12}",
            number,
            settlement.date_str(),
            settlement.payer,
            format!("{} {}", format_money(settlement.bill), units.currency),
            format!("{} {}", format_quantity(settlement.total_mileage), units.distance),
            settlement
                .fuel
                .map(|f| format!("{} {}", format_quantity(f), units.volume))
                .unwrap_or_else(|| "-".to_string()),
            settlement
                .fuel
                .map(|f| format!(
                    "{:.2} {}",
                    average_consumption(f, settlement.total_mileage),
                    units.volume
                ))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!("{}", "-".repeat(80));
    println!("{}", ledger.aggregate_totals_view());
}

fn run_export_command<S: LogbookStore>(
    ledger: &Ledger<S>,
    export_type: ExportKind,
    output: Option<PathBuf>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(ledger.history(), ledger.people());

    // Determine output writer
    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        ExportKind::Settlements => {
            let count = exporter.export_settlements_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} settlements", count);
            }
        }
        ExportKind::Entries => {
            let count = exporter.export_entries_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} mileage entries", count);
            }
        }
        ExportKind::Full => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!("Exported full history: {} periods", snapshot.periods.len());
            }
        }
    }

    Ok(())
}
