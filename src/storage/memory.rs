//! In-memory storage, mainly for tests and embedding.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::models::{Account, Id};

use super::Storage;

pub struct MemoryStorage {
    accounts: Mutex<HashMap<Id, Account>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.lock().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.user_id().cmp(b.user_id()));
        Ok(all)
    }

    async fn get_account(&self, user_id: &Id) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(user_id).cloned())
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.lock().await;
        accounts.insert(account.user_id().clone(), account.clone());
        Ok(())
    }
}
