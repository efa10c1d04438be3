use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::models::{Account, Id};

use super::Storage;

/// JSON file-based storage.
///
/// Directory structure:
/// ```text
/// data/
///   accounts/
///     {user_id}/
///       account.json
/// ```
///
/// Writes go to a sibling temp file that is renamed over `account.json`, so
/// a failed write leaves the previous version intact.
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn accounts_dir(&self) -> PathBuf {
        self.base_path.join("accounts")
    }

    fn account_dir(&self, user_id: &Id) -> Result<PathBuf> {
        if !Id::is_path_safe(user_id.as_str()) {
            anyhow::bail!("Refusing unsafe user id as directory name: {user_id:?}");
        }
        Ok(self.accounts_dir().join(user_id.as_str()))
    }

    fn account_file(&self, user_id: &Id) -> Result<PathBuf> {
        Ok(self.account_dir(user_id)?.join("account.json"))
    }

    async fn read_json<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn write_json_atomic<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let parent = path.parent().context("Account file has no parent directory")?;
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;

        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        let tmp = path.with_extension("json.tmp");
        let result = Self::write_then_rename(&tmp, path, content).await;
        if result.is_err() {
            // A failed write can leave a partial temp file behind.
            if let Err(err) = fs::remove_file(&tmp).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp.display(), error = %err, "Failed to remove temp file");
                }
            }
        }
        result
    }

    async fn write_then_rename(tmp: &Path, path: &Path, content: String) -> Result<()> {
        fs::write(tmp, content)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(tmp, path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))
    }

    async fn list_account_dirs(&self) -> Result<Vec<Id>> {
        let mut ids = Vec::new();

        let mut entries = match fs::read_dir(self.accounts_dir()).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e).context("Failed to read accounts directory"),
        };

        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if Id::is_path_safe(name) => ids.push(Id::from(name)),
                other => tracing::warn!(dir = ?other, "Skipping account directory with unsafe name"),
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[async_trait::async_trait]
impl Storage for JsonFileStorage {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = Vec::new();
        for id in self.list_account_dirs().await? {
            if let Some(account) = self.get_account(&id).await? {
                accounts.push(account);
            }
        }
        Ok(accounts)
    }

    async fn get_account(&self, user_id: &Id) -> Result<Option<Account>> {
        let path = self.account_file(user_id)?;
        let Some(mut account) = self.read_json::<Account>(&path).await? else {
            return Ok(None);
        };

        // The directory is the source of truth for ownership.
        if account.user_id != *user_id {
            tracing::warn!(
                dir = %user_id,
                stored = %account.user_id,
                "Account file user id does not match its directory; using directory name"
            );
            account.user_id = user_id.clone();
        }
        Ok(Some(account))
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        let path = self.account_file(account.user_id())?;
        self.write_json_atomic(&path, account).await
    }
}
