mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

use crate::models::{Account, Id};

/// Persistence for account aggregates.
///
/// An account is always read and written whole: `save_account` either
/// replaces the stored account entirely or fails leaving the previous
/// version in place. Readers therefore never see half of a mutation.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>>;
    async fn get_account(&self, user_id: &Id) -> Result<Option<Account>>;
    async fn save_account(&self, account: &Account) -> Result<()>;
}
