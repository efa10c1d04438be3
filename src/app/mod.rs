mod config;
mod list;
mod mutations;
mod types;

use std::sync::Arc;

use crate::config::ResolvedConfig;
use crate::error::LedgerError;
use crate::service::LedgerService;
use crate::storage::JsonFileStorage;

pub use config::config_output;
pub use list::{audit_account, list_transactions, monthly_series, show_account, show_stats};
pub use mutations::{add_transaction, delete_transaction, init_account, update_transaction};
pub use types::{
    AccountOutput, MonthOutput, SeriesPointOutput, StatsOutput, TransactionOutput,
};

/// Ledger service backed by JSON files under the configured data directory.
pub fn open_service(config: &ResolvedConfig) -> LedgerService {
    let storage = JsonFileStorage::new(&config.data_dir);
    LedgerService::new(Arc::new(storage)).with_seed_months(config.ledger.seed_months)
}

/// JSON body reported for a failed command.
pub fn error_output(err: &LedgerError) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": err.kind(),
        "message": err.to_string(),
    })
}
