use std::fmt;

use crate::domain::{Allocation, People, Period, Totals, Units, format_money, format_quantity};

/// An amount one person owes the payer.
#[derive(Debug, Clone, PartialEq)]
pub struct Debt {
    pub debtor: String,
    pub creditor: String,
    pub amount: f64,
}

/// Outcome of settling a bill.
///
/// `Display` renders the reply text: one "owes" line per person other than
/// the payer, then the consumption line if fuel was given.
#[derive(Debug, Clone)]
pub struct SettlementReport {
    pub allocation: Allocation,
    pub debts: Vec<Debt>,
    pub average_consumption: Option<f64>,
    pub units: Units,
}

impl SettlementReport {
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .debts
            .iter()
            .map(|debt| {
                format!(
                    "{} owes {} {} {}",
                    debt.debtor,
                    debt.creditor,
                    format_money(debt.amount),
                    self.units.currency
                )
            })
            .collect();

        if let Some(average) = self.average_consumption {
            lines.push(format!(
                "Average consumption: {:.2} {}/100 {}",
                average, self.units.volume, self.units.distance
            ));
        }

        lines
    }
}

impl fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Render "Total: <mileage> <distance> and <cost> <currency>".
pub fn render_totals(totals: &Totals, units: &Units) -> String {
    format!(
        "Total: {} {} and {} {}",
        format_quantity(totals.mileage),
        units.distance,
        format_quantity(totals.cost),
        units.currency
    )
}

/// Render the period as a grid: one column per person, one row per entry
/// index, a divider after the last entry row, then a totals row.
///
/// ```text
/// +-----+-----+
/// | Eve | Bob |
/// +-----+-----+
/// | 100 | 400 |
/// |     | 300 |
/// +-----+-----+
/// | 100 | 700 |
/// +-----+-----+
/// ```
pub fn render_period_table(period: &Period, people: &People) -> String {
    let header: Vec<String> = people.iter().map(str::to_string).collect();
    let rows = period.max_entries(people);

    let body: Vec<Vec<String>> = (0..rows)
        .map(|index| {
            people
                .iter()
                .map(|p| {
                    period
                        .entries_for(p)
                        .get(index)
                        .map(|v| format_quantity(*v))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let totals: Vec<String> = people
        .iter()
        .map(|p| format_quantity(period.personal_mileage(p)))
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(body.iter())
                .chain(std::iter::once(&totals))
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let divider = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut lines = vec![divider.clone(), render_row(&header, &widths), divider.clone()];
    if !body.is_empty() {
        lines.extend(body.iter().map(|row| render_row(row, &widths)));
        lines.push(divider.clone());
    }
    lines.push(render_row(&totals, &widths));
    lines.push(divider);

    lines.join("\n")
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!(" {:^width$} ", cell, width = width))
        .collect();
    format!("|{}|", cells.join("|"))
}
