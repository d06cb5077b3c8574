// Application layer - the ledger service and everything a transport needs
// to talk to it: errors, rendered views and the chat command parser.

mod command;
pub mod error;
mod reporting;
mod service;

pub use command::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
