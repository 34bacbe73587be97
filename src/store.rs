use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use tracing::{debug, error};

use crate::{
    account::Account,
    data::{Error, ModelEvent},
    listeners::{ListenerId, Listeners, Model},
    read::read_accounts,
    write::write_accounts,
};

/// This is where accounts are stored, in insertion order (or sorted by id right
/// after a load). Like `Account`, it is single-threaded: listeners are plain
/// boxed closures, so the list is neither `Send` nor `Sync`.
#[derive(Debug, Default)]
pub struct AccountList {
    accounts: Vec<Account>,
    listeners: Listeners<ModelEvent>,
}

impl AccountList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id() == id)
    }

    /// Mutable access for deposits and withdrawals. Store listeners are not
    /// told about those; call `update_account_views` afterwards.
    pub fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id() == id)
    }

    pub fn add_account(&mut self, account: Account) {
        debug!(id = account.id(), "adding account");
        let event = ModelEvent::balance_update(account.balance());
        self.accounts.push(account);
        self.notify_changed(&event);
    }

    /// Removes the first account with this id. Listeners only hear about it
    /// if an account was actually removed.
    pub fn remove_account(&mut self, id: &str) -> Option<Account> {
        let index = self.accounts.iter().position(|account| account.id() == id)?;
        let account = self.accounts.remove(index);
        debug!(id, "removed account");
        self.notify_changed(&ModelEvent::balance_update(account.balance()));
        Some(account)
    }

    /// Broadcasts the current balance of `id` to store listeners. Returns
    /// `false` for an unknown id.
    pub fn update_account_views(&mut self, id: &str) -> bool {
        match self.account(id) {
            Some(account) => {
                let event = ModelEvent::balance_update(account.balance());
                self.notify_changed(&event);
                true
            }
            None => false,
        }
    }

    /// Replaces every account with the ones read from `path`, sorted by id.
    /// Malformed lines are skipped; if the file can't be read at all, the
    /// current accounts are left alone and the error is returned.
    pub fn load_accounts<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, Error> {
        let path = path.as_ref();
        let mut accounts = File::open(path)
            .map_err(Error::from)
            .and_then(|file| read_accounts(BufReader::new(file)))
            .map_err(|e| {
                error!("Error loading accounts from {}: {e}", path.display());
                e
            })?;
        // Ordered by UTF-16 code units, not UTF-8 bytes.
        accounts.sort_by(|a, b| a.id().encode_utf16().cmp(b.id().encode_utf16()));
        debug!(count = accounts.len(), path = %path.display(), "loaded accounts");
        self.accounts = accounts;
        Ok(self.accounts.len())
    }

    /// Overwrites `path` with the current accounts, in order. A failure
    /// halfway through may leave a truncated file behind.
    pub fn save_accounts<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path)?;
        write_accounts(BufWriter::new(file), &self.accounts)?;
        debug!(count = self.accounts.len(), path = %path.display(), "saved accounts");
        Ok(())
    }
}

impl Model for AccountList {
    fn notify_changed(&mut self, event: &ModelEvent) {
        self.listeners.notify(event);
    }

    fn add_model_listener(&mut self, listener: Box<dyn FnMut(&ModelEvent)>) -> ListenerId {
        self.listeners.add_boxed(listener)
    }

    fn remove_model_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}
