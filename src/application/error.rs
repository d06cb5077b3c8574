use thiserror::Error;

use crate::domain::PeopleError;

use super::SettlementReport;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unknown person: {0}")]
    InvalidPerson(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The in-memory change already happened; only the write failed.
    #[error("Could not save logbook: {0:#}")]
    Persistence(#[from] anyhow::Error),

    /// The period was settled in memory but the write failed. The report is
    /// kept so the debts can still be shown; call [`Ledger::save`] to retry.
    ///
    /// [`Ledger::save`]: super::Ledger::save
    #[error("Could not save logbook: {source:#}")]
    UnsavedSettlement {
        report: Box<SettlementReport>,
        source: anyhow::Error,
    },
}

impl LedgerError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument(message.into())
    }

    /// True when only the write failed and the in-memory state changed.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            LedgerError::Persistence(_) | LedgerError::UnsavedSettlement { .. }
        )
    }

    /// Settlement computed before a failed write, if any.
    pub fn unsaved_report(&self) -> Option<&SettlementReport> {
        match self {
            LedgerError::UnsavedSettlement { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }
}

impl From<PeopleError> for LedgerError {
    fn from(err: PeopleError) -> Self {
        LedgerError::InvalidArgument(err.to_string())
    }
}
