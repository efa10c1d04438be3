#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tallybook::clock::FixedClock;
use tallybook::models::{Account, FixedIdGenerator, Id, TransactionDraft};
use tallybook::storage::{MemoryStorage, Storage};
use tallybook::LedgerService;

pub fn may_2024() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap(),
    ))
}

/// Service over `storage` with a pinned clock and `tx-1`, `tx-2`, ... ids.
pub fn service_with(storage: Arc<dyn Storage>) -> LedgerService {
    LedgerService::new(storage)
        .with_clock(may_2024())
        .with_id_generator(Arc::new(FixedIdGenerator::sequential("tx", 64)))
}

pub fn memory_service() -> LedgerService {
    service_with(Arc::new(MemoryStorage::new()))
}

pub fn revenue(date: &str, amount: i64) -> TransactionDraft {
    TransactionDraft::new(date, amount, "revenue")
}

pub fn expense(date: &str, amount: i64) -> TransactionDraft {
    TransactionDraft::new(date, amount, "expense")
}

pub fn user(name: &str) -> Id {
    Id::from_string(name)
}

/// Storage whose saves can be switched to fail, for commit-failure tests.
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_saves: AtomicBool,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.inner.list_accounts().await
    }

    async fn get_account(&self, user_id: &Id) -> Result<Option<Account>> {
        self.inner.get_account(user_id).await
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("simulated write failure");
        }
        self.inner.save_account(account).await
    }
}
