use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    data::{Error, Overdraft},
    listeners::{ListenerId, Listeners},
};

/// A single account. Balances only move through `deposit` and `withdraw`, and
/// every successful move is pushed to the account's listeners.
#[derive(Debug)]
pub struct Account {
    name: String,
    id: String,
    balance: Decimal,
    listeners: Listeners<Account>,
}

impl Account {
    pub fn new(name: impl Into<String>, id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            balance,
            listeners: Listeners::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Adds `amount` and returns the new balance.
    ///
    /// The sign of `amount` is not checked: a negative deposit lowers the
    /// balance without going through the overdraft rule. The only failure is
    /// a result outside the range of `Decimal`, which leaves the balance as is.
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal, Error> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(Error::Overflow {
                balance: self.balance,
                amount,
            })?;
        debug!(id = %self.id, %amount, balance = %self.balance, "deposit");
        self.notify_listeners();
        Ok(self.balance)
    }

    /// Takes `amount` out and returns the new balance, unless that balance
    /// would be negative (`Error::Overdraft`) or out of range, in which case
    /// nothing changes and no listener runs.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Decimal, Error> {
        let balance = self.balance.checked_sub(amount).ok_or(Error::Overflow {
            balance: self.balance,
            amount,
        })?;
        if balance < Decimal::ZERO {
            return Err(Overdraft {
                shortfall: balance.abs(),
            }
            .into());
        }
        self.balance = balance;
        debug!(id = %self.id, %amount, balance = %self.balance, "withdrawal");
        self.notify_listeners();
        Ok(self.balance)
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Account) + 'static,
    {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // Listeners get `&Account`, so they are moved out for the duration of the
    // call. The guard puts them back even if one of them panics.
    fn notify_listeners(&mut self) {
        let listeners = std::mem::take(&mut self.listeners);
        let mut guard = RestoreListeners {
            account: self,
            listeners,
        };
        let RestoreListeners { account, listeners } = &mut guard;
        listeners.notify(&**account);
    }
}

struct RestoreListeners<'a> {
    account: &'a mut Account,
    listeners: Listeners<Account>,
}

impl Drop for RestoreListeners<'_> {
    fn drop(&mut self) {
        self.account.listeners = std::mem::take(&mut self.listeners);
    }
}

/// Accounts compare by content; listeners are not part of an account's identity.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.id == other.id && self.balance == other.balance
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::Account;
    use crate::data::{Error, Overdraft};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::{
        cell::RefCell,
        panic::{catch_unwind, AssertUnwindSafe},
        rc::Rc,
    };

    fn test_account() -> Account {
        Account::new("Maitland Huffman", "12345", dec!(100.0))
    }

    fn record_balances(account: &mut Account) -> Rc<RefCell<Vec<Decimal>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        account.add_listener(move |account: &Account| sink.borrow_mut().push(account.balance()));
        seen
    }

    #[test]
    fn test_accessors() {
        let account = test_account();
        assert_eq!(account.name(), "Maitland Huffman");
        assert_eq!(account.id(), "12345");
        assert_eq!(account.balance(), dec!(100));
        assert_eq!(account.to_string(), "12345 - Maitland Huffman");
    }

    #[test]
    fn test_deposit() {
        let mut account = test_account();
        let seen = record_balances(&mut account);
        assert_eq!(account.deposit(dec!(50.00)).unwrap(), dec!(150.00));
        assert_eq!(account.balance(), dec!(150));
        assert_eq!(*seen.borrow(), [dec!(150)]);
    }

    #[test]
    fn test_negative_deposit_is_not_rejected() {
        let mut account = test_account();
        assert_eq!(account.deposit(dec!(-250)).unwrap(), dec!(-150));
    }

    #[test]
    fn test_withdraw() {
        let mut account = test_account();
        let seen = record_balances(&mut account);
        assert_eq!(account.withdraw(dec!(50.0)).unwrap(), dec!(50.0));
        assert_eq!(*seen.borrow(), [dec!(50)]);
    }

    #[test]
    fn test_withdraw_everything() {
        let mut account = test_account();
        assert_eq!(account.withdraw(dec!(100.00)).unwrap(), dec!(0));
        assert!(account.balance().is_zero());
    }

    #[test]
    fn test_withdraw_overdraft() {
        let mut account = test_account();
        let seen = record_balances(&mut account);
        assert!(matches!(
            account.withdraw(dec!(200.00)),
            Err(Error::Overdraft(Overdraft { shortfall })) if shortfall == dec!(100.00)
        ));
        assert_eq!(account.balance(), dec!(100.0));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_listeners_run_in_order_and_can_be_removed() {
        let mut account = test_account();
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let first_id = account.add_listener(move |_: &Account| first.borrow_mut().push(1));
        let second = Rc::clone(&order);
        account.add_listener(move |_: &Account| second.borrow_mut().push(2));

        account.deposit(dec!(1)).unwrap();
        assert!(account.remove_listener(first_id));
        account.deposit(dec!(1)).unwrap();
        assert_eq!(*order.borrow(), [1, 2, 2]);
    }

    #[test]
    fn test_equality_ignores_listeners() {
        let mut account = test_account();
        account.add_listener(|_: &Account| {});
        assert_eq!(account, Account::new("Maitland Huffman", "12345", dec!(100.00)));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut account = Account::new("Rich", "1", Decimal::MAX);
        let seen = record_balances(&mut account);
        assert!(matches!(
            account.deposit(dec!(1)),
            Err(Error::Overflow { balance, amount }) if balance == Decimal::MAX && amount == dec!(1)
        ));
        assert_eq!(account.balance(), Decimal::MAX);

        let mut account = Account::new("Poor", "2", dec!(-1));
        assert!(matches!(
            account.withdraw(Decimal::MAX),
            Err(Error::Overflow { .. })
        ));
        assert_eq!(account.balance(), dec!(-1));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_listeners_survive_a_panicking_listener() {
        let mut account = test_account();
        let mut armed = true;
        account.add_listener(move |_: &Account| {
            if std::mem::take(&mut armed) {
                panic!("listener failed");
            }
        });
        let seen = record_balances(&mut account);

        let result = catch_unwind(AssertUnwindSafe(|| account.deposit(dec!(1))));
        assert!(result.is_err());
        assert!(seen.borrow().is_empty());

        account.deposit(dec!(1)).unwrap();
        assert_eq!(*seen.borrow(), [dec!(102.0)]);
    }
}
