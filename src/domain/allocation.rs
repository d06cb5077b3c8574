use super::{People, Period};

/// What one person pays for a settled bill.
#[derive(Debug, Clone, PartialEq)]
pub struct CostShare {
    pub person: String,
    pub mileage: f64,
    pub cost: f64,
}

/// Breakdown of a bill across logged and unattributed mileage.
///
/// All values keep full floating precision; rounding happens only when
/// rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub attributed_mileage: f64,
    pub neutral_mileage: f64,
    pub per_km_cost: f64,
    pub neutral_cost_per_person: f64,
    /// One share per person, in the configured order.
    pub shares: Vec<CostShare>,
}

impl Allocation {
    pub fn share_of(&self, person: &str) -> Option<&CostShare> {
        self.shares.iter().find(|s| s.person == person)
    }

    pub fn total_cost(&self) -> f64 {
        self.shares.iter().fold(0.0, |acc, s| acc + s.cost)
    }
}

/// Split `bill` over the mileage logged in `period`.
///
/// Mileage nobody logged (total minus the attributed sum, never negative) is
/// shared overhead and split equally between everyone. `total_mileage` must be
/// positive.
pub fn allocate(period: &Period, people: &People, total_mileage: f64, bill: f64) -> Allocation {
    let personal: Vec<(String, f64)> = people
        .iter()
        .map(|p| (p.to_string(), period.personal_mileage(p)))
        .collect();

    let attributed_mileage: f64 = personal.iter().fold(0.0, |acc, (_, m)| acc + m);
    let neutral_mileage = (total_mileage - attributed_mileage).max(0.0);
    let per_km_cost = bill / total_mileage;
    let neutral_cost_per_person = (neutral_mileage * per_km_cost) / people.len() as f64;

    let shares = personal
        .into_iter()
        .map(|(person, mileage)| CostShare {
            cost: mileage * per_km_cost + neutral_cost_per_person,
            person,
            mileage,
        })
        .collect();

    Allocation {
        attributed_mileage,
        neutral_mileage,
        per_km_cost,
        neutral_cost_per_person,
        shares,
    }
}

/// Average fuel use per 100 distance units.
pub fn average_consumption(fuel: f64, total_mileage: f64) -> f64 {
    fuel / (total_mileage / 100.0)
}
