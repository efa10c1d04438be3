//! Command and query surface over stored accounts.
//!
//! Mutations on one account are serialized by a per-account lock held for
//! the whole load -> reconcile -> save cycle. The engine works on a copy
//! of the stored account; the copy is only handed back after the save
//! succeeds, so a failed commit leaves the stored account as it was.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{self, Discrepancy};
use crate::models::{
    Account, AccountStats, Id, IdGenerator, Transaction, TransactionDraft, UuidIdGenerator,
};
use crate::projection::{monthly_series, MonthlyPoint};
use crate::storage::Storage;

/// Result of a create or update.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionOutcome {
    pub account: Account,
    pub transaction: Transaction,
}

/// Result of a delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub message: String,
    pub account: Account,
}

pub struct LedgerService {
    storage: Arc<dyn Storage>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    seed_months: bool,
    locks: Mutex<HashMap<Id, Arc<Mutex<()>>>>,
}

impl LedgerService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            ids: Arc::new(UuidIdGenerator),
            clock: Arc::new(SystemClock),
            seed_months: true,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Whether new accounts get zeroed months from January through the
    /// current month.
    pub fn with_seed_months(mut self, seed_months: bool) -> Self {
        self.seed_months = seed_months;
        self
    }

    async fn lock_account(&self, user_id: &Id) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(user_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the account's lock entry once nobody else holds or awaits it.
    /// Clones are only taken under the table lock, so a count of one here
    /// means the table owns the last reference.
    async fn release_account(&self, user_id: &Id, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut locks = self.locks.lock().await;
        if locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(user_id);
        }
    }

    async fn load(&self, user_id: &Id) -> LedgerResult<Account> {
        match self.storage.get_account(user_id).await {
            Ok(Some(account)) => Ok(account),
            Ok(None) => {
                warn!(user_id = %user_id, "Account not found");
                Err(LedgerError::AccountNotFound(user_id.clone()))
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Failed to load account");
                Err(LedgerError::Persistence(err))
            }
        }
    }

    async fn commit(&self, account: &Account) -> LedgerResult<()> {
        self.storage.save_account(account).await.map_err(|err| {
            warn!(user_id = %account.user_id(), error = %err, "Failed to persist account");
            LedgerError::Persistence(err)
        })
    }

    /// Run `op` against a scratch copy of the account under its lock and
    /// persist the result.
    async fn mutate<T>(
        &self,
        user_id: &Id,
        op: impl FnOnce(&mut Account, &dyn IdGenerator) -> LedgerResult<T>,
    ) -> LedgerResult<(Account, T)> {
        let guard = self.lock_account(user_id).await;
        let result = self.mutate_locked(user_id, op).await;
        self.release_account(user_id, guard).await;
        result
    }

    async fn mutate_locked<T>(
        &self,
        user_id: &Id,
        op: impl FnOnce(&mut Account, &dyn IdGenerator) -> LedgerResult<T>,
    ) -> LedgerResult<(Account, T)> {
        let mut account = self.load(user_id).await?;
        let out = op(&mut account, self.ids.as_ref())?;
        self.commit(&account).await?;
        Ok((account, out))
    }

    /// One-time setup of a user's account.
    pub async fn initialize_account(&self, user_id: &Id) -> LedgerResult<Account> {
        let guard = self.lock_account(user_id).await;
        let result = self.create_account(user_id).await;
        self.release_account(user_id, guard).await;
        result
    }

    async fn create_account(&self, user_id: &Id) -> LedgerResult<Account> {
        let existing = self
            .storage
            .get_account(user_id)
            .await
            .map_err(LedgerError::Persistence)?;
        if existing.is_some() {
            warn!(user_id = %user_id, "Account already initialized");
            return Err(LedgerError::AccountExists(user_id.clone()));
        }

        let account = Account::open(user_id.clone(), self.clock.as_ref(), self.seed_months);
        self.commit(&account).await?;
        info!(user_id = %user_id, months = account.monthly_data().len(), "Account initialized");
        Ok(account)
    }

    pub async fn get_account(&self, user_id: &Id) -> LedgerResult<Account> {
        debug!(user_id = %user_id, "Fetching account");
        self.load(user_id).await
    }

    pub async fn get_account_stats(&self, user_id: &Id) -> LedgerResult<AccountStats> {
        debug!(user_id = %user_id, "Fetching account stats");
        Ok(self.load(user_id).await?.stats())
    }

    pub async fn get_transactions(&self, user_id: &Id) -> LedgerResult<Vec<Transaction>> {
        debug!(user_id = %user_id, "Fetching transactions");
        Ok(self.load(user_id).await?.transactions().as_slice().to_vec())
    }

    /// Twelve-month, gap-filled revenue/expense series for charting and
    /// forecasting consumers.
    pub async fn monthly_series(&self, user_id: &Id) -> LedgerResult<Vec<MonthlyPoint>> {
        debug!(user_id = %user_id, "Building monthly series");
        Ok(monthly_series(self.load(user_id).await?.monthly_data()))
    }

    /// Compare stored aggregates with a full recomputation from the log.
    pub async fn audit_account(&self, user_id: &Id) -> LedgerResult<Vec<Discrepancy>> {
        let account = self.load(user_id).await?;
        let found = ledger::audit(&account, 0);
        if !found.is_empty() {
            warn!(user_id = %user_id, count = found.len(), "Account aggregates disagree with transaction log");
        }
        Ok(found)
    }

    pub async fn add_transaction(
        &self,
        user_id: &Id,
        draft: &TransactionDraft,
    ) -> LedgerResult<TransactionOutcome> {
        let fields = draft.validate().inspect_err(|err| {
            warn!(user_id = %user_id, error = %err, "Rejected new transaction");
        })?;

        let (account, transaction) = self
            .mutate(user_id, |account, ids| {
                ledger::add_transaction(account, ids, fields)
            })
            .await?;

        info!(
            user_id = %user_id,
            transaction_id = %transaction.id,
            kind = %transaction.kind,
            amount = transaction.amount,
            "Transaction added"
        );
        Ok(TransactionOutcome {
            account,
            transaction,
        })
    }

    pub async fn update_transaction(
        &self,
        user_id: &Id,
        transaction_id: &Id,
        draft: &TransactionDraft,
    ) -> LedgerResult<TransactionOutcome> {
        let fields = draft.validate().inspect_err(|err| {
            warn!(user_id = %user_id, transaction_id = %transaction_id, error = %err, "Rejected transaction update");
        })?;

        let (account, transaction) = self
            .mutate(user_id, |account, _| {
                ledger::update_transaction(account, transaction_id, fields)
            })
            .await
            .inspect_err(|err| log_missing_transaction(user_id, err))?;

        info!(
            user_id = %user_id,
            transaction_id = %transaction.id,
            kind = %transaction.kind,
            amount = transaction.amount,
            "Transaction updated"
        );
        Ok(TransactionOutcome {
            account,
            transaction,
        })
    }

    pub async fn delete_transaction(
        &self,
        user_id: &Id,
        transaction_id: &Id,
    ) -> LedgerResult<DeleteOutcome> {
        let (account, removed) = self
            .mutate(user_id, |account, _| {
                ledger::delete_transaction(account, transaction_id)
            })
            .await
            .inspect_err(|err| log_missing_transaction(user_id, err))?;

        info!(user_id = %user_id, transaction_id = %removed.id, "Transaction deleted");
        Ok(DeleteOutcome {
            message: "Transaction deleted successfully".to_string(),
            account,
        })
    }
}

fn log_missing_transaction(user_id: &Id, err: &LedgerError) {
    if let LedgerError::TransactionNotFound(id) = err {
        warn!(user_id = %user_id, transaction_id = %id, "Transaction not found");
    }
}
