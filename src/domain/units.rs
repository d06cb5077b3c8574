/// Labels used when rendering amounts. They never affect arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Units {
    pub currency: String,
    pub distance: String,
    pub volume: String,
}

impl Units {
    pub fn new(
        currency: impl Into<String>,
        distance: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            currency: currency.into(),
            distance: distance.into(),
            volume: volume.into(),
        }
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::new("EUR", "km", "l")
    }
}

/// Format a money amount with exactly two fractional digits.
/// Example: 20.0 -> "20.00", 3.14159 -> "3.14"
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Format a distance or volume in its shortest form.
/// Example: 100.0 -> "100", 2.5 -> "2.5"
pub fn format_quantity(value: f64) -> String {
    format!("{}", value)
}
