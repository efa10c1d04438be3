use thiserror::Error;

use crate::models::Id;

/// Input rejected before the ledger is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid amount {0:?}: expected a whole number of minor units from 1 to 10^15")]
    InvalidAmount(String),
    #[error("Amount {0} would overflow the account totals")]
    TotalsOverflow(i64),
    #[error("Invalid transaction type {0:?}: expected \"revenue\" or \"expense\"")]
    InvalidKind(String),
    #[error("Invalid date {0:?}: expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
    #[error(transparent)]
    InvalidId(#[from] crate::models::IdError),
}

/// Failures surfaced by the ledger service. None of them leave a partial
/// mutation behind.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account not found for user {0}")]
    AccountNotFound(Id),
    #[error("Account already exists for user {0}")]
    AccountExists(Id),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Id),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to persist account: {0:#}")]
    Persistence(anyhow::Error),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::AccountNotFound(_) | LedgerError::TransactionNotFound(_)
        )
    }

    /// Stable machine-readable tag used in CLI JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::AccountNotFound(_) | LedgerError::TransactionNotFound(_) => "not_found",
            LedgerError::AccountExists(_) => "conflict",
            LedgerError::Validation(_) => "validation",
            LedgerError::Persistence(_) => "persistence",
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let id = Id::from_string("u1");
        assert_eq!(LedgerError::AccountNotFound(id.clone()).kind(), "not_found");
        assert_eq!(LedgerError::TransactionNotFound(id.clone()).kind(), "not_found");
        assert_eq!(
            LedgerError::from(ValidationError::MissingField("amount")).kind(),
            "validation"
        );
        assert_eq!(
            LedgerError::Persistence(anyhow::anyhow!("disk full")).kind(),
            "persistence"
        );
        assert!(LedgerError::AccountNotFound(id).is_not_found());
    }

    #[test]
    fn persistence_message_includes_cause_chain() {
        let err = LedgerError::Persistence(
            anyhow::anyhow!("disk full").context("Failed to write file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("Failed to write file"));
        assert!(msg.contains("disk full"));
    }
}
