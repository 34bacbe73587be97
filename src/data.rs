use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::account::Account;

/// What changed in a model. Only `BalanceUpdate` has a producer today; the
/// other kinds are kept so listeners can already match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    BalanceUpdate,
    AgentStatusUpdate,
    AmountTransferredUpdate,
}

/// Status tag carried by every event. Everything emitted by this crate uses
/// `NotApplicable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatus {
    Running,
    Blocked,
    Paused,
    #[default]
    NotApplicable,
}

/// Envelope handed to store-level listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEvent {
    pub kind: EventKind,
    pub balance: Decimal,
    pub agent_status: AgentStatus,
}

impl ModelEvent {
    pub fn new(kind: EventKind, balance: Decimal, agent_status: AgentStatus) -> Self {
        Self {
            kind,
            balance,
            agent_status,
        }
    }

    /// The only shape produced by `AccountList`.
    pub fn balance_update(balance: Decimal) -> Self {
        Self::new(EventKind::BalanceUpdate, balance, AgentStatus::NotApplicable)
    }
}

/// Returned by `Account::withdraw` when the balance would go below zero. The
/// balance is left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Overdraft occurred: {shortfall}")]
pub struct Overdraft {
    pub shortfall: Decimal,
}

/// Failures reported to callers. Malformed lines in an account file are not
/// in here: they are logged and skipped by the importer.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Overdraft(#[from] Overdraft),
    #[error("Balance out of range: {balance} with {amount} applied")]
    Overflow { balance: Decimal, amount: Decimal },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Io(err.into())
    }
}

/// Why a single line of an account file was skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid line format (missing parts): expected 3 fields, found {found}")]
    MissingFields { found: usize },
    #[error("Invalid balance format: {value:?}")]
    InvalidBalance { value: String },
}

/// Borrowing proxy used to serialize an `Account` as `name,id,balance`; the
/// listeners attached to the account have no place in the file.
#[derive(Serialize)]
pub(crate) struct AccountRecord<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub balance: Decimal,
}

impl<'a> From<&'a Account> for AccountRecord<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            name: account.name(),
            id: account.id(),
            balance: account.balance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentStatus, Error, EventKind, ModelEvent, Overdraft};
    use rust_decimal_macros::dec;

    #[test]
    fn balance_update_shape() {
        let event = ModelEvent::balance_update(dec!(42.10));
        assert_eq!(event.kind, EventKind::BalanceUpdate);
        assert_eq!(event.balance, dec!(42.10));
        assert_eq!(event.agent_status, AgentStatus::NotApplicable);
    }

    #[test]
    fn overdraft_message() {
        let err = Overdraft {
            shortfall: dec!(100.00),
        };
        assert_eq!(err.to_string(), "Overdraft occurred: 100.00");
        assert_eq!(Error::from(err).to_string(), "Overdraft occurred: 100.00");
    }
}
