//! Account management core: accounts with overdraft-checked withdrawals, an
//! ordered account list persisted as `name,id,balance` lines, and synchronous
//! listeners that let a view redraw whenever something changes.

mod account;
pub mod currency;
mod data;
mod listeners;
mod read;
mod store;
mod write;

pub use account::Account;
pub use currency::Currency;
pub use data::{AgentStatus, Error, EventKind, ModelEvent, Overdraft, RecordError};
pub use listeners::{ListenerId, Listeners, Model};
pub use read::parse_amount;
pub use store::AccountList;
