use crate::config::DisplayConfig;
use crate::error::LedgerResult;
use crate::models::{Id, TransactionDraft};
use crate::service::LedgerService;

use super::{AccountOutput, TransactionOutput};

pub async fn init_account(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
) -> LedgerResult<serde_json::Value> {
    let account = service.initialize_account(user_id).await?;
    Ok(serde_json::json!({
        "success": true,
        "account": AccountOutput::new(&account, display),
    }))
}

pub async fn add_transaction(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
    draft: &TransactionDraft,
) -> LedgerResult<serde_json::Value> {
    let outcome = service.add_transaction(user_id, draft).await?;
    Ok(serde_json::json!({
        "success": true,
        "account": AccountOutput::new(&outcome.account, display),
        "transaction": TransactionOutput::new(&outcome.transaction, display),
    }))
}

pub async fn update_transaction(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
    transaction_id: &Id,
    draft: &TransactionDraft,
) -> LedgerResult<serde_json::Value> {
    let outcome = service
        .update_transaction(user_id, transaction_id, draft)
        .await?;
    Ok(serde_json::json!({
        "success": true,
        "account": AccountOutput::new(&outcome.account, display),
        "transaction": TransactionOutput::new(&outcome.transaction, display),
    }))
}

pub async fn delete_transaction(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
    transaction_id: &Id,
) -> LedgerResult<serde_json::Value> {
    let outcome = service.delete_transaction(user_id, transaction_id).await?;
    Ok(serde_json::json!({
        "success": true,
        "message": outcome.message,
        "account": AccountOutput::new(&outcome.account, display),
    }))
}
