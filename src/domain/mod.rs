mod allocation;
mod logbook;
mod people;
mod period;
mod units;

pub use allocation::*;
pub use logbook::*;
pub use people::*;
pub use period::*;
pub use units::*;
