use crate::domain::Units;

/// A chat message turned into a ledger action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    RecordMileage {
        amount: i64,
    },
    SettleBill {
        mileage: i64,
        bill: i64,
        fuel: Option<i64>,
    },
    Malformed {
        reason: ParseError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("There must be at least one number.")]
    Empty,
    #[error("All arguments must be numbers.")]
    NotANumber,
    #[error("Number out of range: {0}")]
    OutOfRange(String),
    #[error("Too many numbers: expected at most 3, got {0}.")]
    TooManyNumbers(usize),
}

/// Parses a message of whole numbers separated by single spaces.
///
/// Rules:
/// - `50` => RecordMileage (negative values are corrections)
/// - `600 60` => SettleBill after 600 distance units for 60 currency units
/// - `400 35 24` => SettleBill with 24 units of fuel
///
/// Every token must match `-?[0-9]+`.
pub fn parse_command(input: &str) -> Command {
    match parse_numbers(input) {
        Ok(numbers) => match numbers.as_slice() {
            [] => Command::Malformed {
                reason: ParseError::Empty,
            },
            [amount] => Command::RecordMileage { amount: *amount },
            [mileage, bill] => Command::SettleBill {
                mileage: *mileage,
                bill: *bill,
                fuel: None,
            },
            [mileage, bill, fuel] => Command::SettleBill {
                mileage: *mileage,
                bill: *bill,
                fuel: Some(*fuel),
            },
            more => Command::Malformed {
                reason: ParseError::TooManyNumbers(more.len()),
            },
        },
        Err(reason) => Command::Malformed { reason },
    }
}

fn parse_numbers(input: &str) -> Result<Vec<i64>, ParseError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    // Exactly one space between numbers; any other gap is an empty token.
    input.split(' ').map(parse_integer).collect()
}

fn parse_integer(token: &str) -> Result<i64, ParseError> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::NotANumber);
    }
    token
        .parse()
        .map_err(|_| ParseError::OutOfRange(token.to_string()))
}

impl Command {
    /// Summary shown before the user confirms the command.
    pub fn preview(&self, units: &Units) -> String {
        let (distance, price, fuel) = match self {
            Command::RecordMileage { amount } => (amount.to_string(), None, None),
            Command::SettleBill {
                mileage,
                bill,
                fuel,
            } => (mileage.to_string(), Some(*bill), *fuel),
            Command::Malformed { reason } => return reason.to_string(),
        };

        let or_dash = |value: Option<i64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

        format!(
            "Distance: {} {}\nPrice: {} {}\nFuel: {} {}",
            distance,
            units.distance,
            or_dash(price),
            units.currency,
            or_dash(fuel),
            units.volume
        )
    }
}
