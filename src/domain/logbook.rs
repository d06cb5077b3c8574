use super::{People, Period, Settlement};

/// Ordered period history. The last period is the open one; every earlier
/// period is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Logbook {
    periods: Vec<Period>,
}

/// Summed bills and mileage across the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub mileage: f64,
    pub cost: f64,
}

impl Logbook {
    /// A fresh history holding a single open period.
    pub fn new(people: &People) -> Self {
        Self {
            periods: vec![Period::open(people)],
        }
    }

    /// Restore a stored history, repairing it so the invariants hold.
    /// Returns the logbook and whether it differs from what was stored.
    pub fn restore(mut periods: Vec<Period>, people: &People) -> (Self, bool) {
        let mut repaired = false;

        for period in &mut periods {
            repaired |= period.ensure_people(people);
        }

        if periods.last().is_none_or(Period::is_closed) {
            periods.push(Period::open(people));
            repaired = true;
        }

        (Self { periods }, repaired)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Closed periods, oldest first.
    pub fn closed_periods(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter().filter(|p| p.is_closed())
    }

    pub fn current(&self) -> &Period {
        // restore() and new() guarantee at least one period
        &self.periods[self.periods.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Period {
        let last = self.periods.len() - 1;
        &mut self.periods[last]
    }

    pub fn record(&mut self, person: &str, amount: f64) {
        self.current_mut().push_entry(person, amount);
    }

    /// Attach settlement metadata to the current period and open a new one.
    pub fn close_current(&mut self, settlement: Settlement, people: &People) {
        self.current_mut().settlement = Some(settlement);
        self.periods.push(Period::open(people));
    }

    /// Drop the current period and replace it with an empty one.
    pub fn reset_current(&mut self, people: &People) {
        self.periods.pop();
        self.periods.push(Period::open(people));
    }

    pub fn totals(&self) -> Totals {
        self.periods.iter().fold(Totals::default(), |acc, period| Totals {
            mileage: acc.mileage + period.total_mileage(),
            cost: acc.cost + period.bill(),
        })
    }
}
