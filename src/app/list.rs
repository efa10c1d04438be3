use crate::config::DisplayConfig;
use crate::error::LedgerResult;
use crate::models::Id;
use crate::service::LedgerService;

use super::{AccountOutput, SeriesPointOutput, StatsOutput, TransactionOutput};

pub async fn show_account(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
) -> LedgerResult<AccountOutput> {
    let account = service.get_account(user_id).await?;
    Ok(AccountOutput::new(&account, display))
}

pub async fn show_stats(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
) -> LedgerResult<StatsOutput> {
    let stats = service.get_account_stats(user_id).await?;
    Ok(StatsOutput::new(stats, display))
}

pub async fn list_transactions(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
) -> LedgerResult<Vec<TransactionOutput>> {
    let transactions = service.get_transactions(user_id).await?;
    Ok(transactions
        .iter()
        .map(|t| TransactionOutput::new(t, display))
        .collect())
}

pub async fn monthly_series(
    service: &LedgerService,
    display: &DisplayConfig,
    user_id: &Id,
) -> LedgerResult<Vec<SeriesPointOutput>> {
    let series = service.monthly_series(user_id).await?;
    Ok(series
        .into_iter()
        .map(|p| SeriesPointOutput::new(p, display))
        .collect())
}

pub async fn audit_account(service: &LedgerService, user_id: &Id) -> LedgerResult<serde_json::Value> {
    let discrepancies = service.audit_account(user_id).await?;
    Ok(serde_json::json!({
        "user_id": user_id.to_string(),
        "consistent": discrepancies.is_empty(),
        "discrepancies": discrepancies,
    }))
}
