use serde::Serialize;

use crate::config::DisplayConfig;
use crate::format::format_amount;
use crate::models::{Account, AccountStats, Month, MonthlyAggregate, Transaction, TransactionKind};
use crate::projection::MonthlyPoint;

/// JSON output for balance totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    pub current_balance: i64,
    pub total_revenue: i64,
    pub total_expenses: i64,
    pub current_balance_display: String,
    pub total_revenue_display: String,
    pub total_expenses_display: String,
}

impl StatsOutput {
    pub fn new(stats: AccountStats, display: &DisplayConfig) -> Self {
        Self {
            current_balance: stats.current_balance,
            total_revenue: stats.total_revenue,
            total_expenses: stats.total_expenses,
            current_balance_display: format_amount(stats.current_balance, display),
            total_revenue_display: format_amount(stats.total_revenue, display),
            total_expenses_display: format_amount(stats.total_expenses, display),
        }
    }
}

/// JSON output for one monthly rollup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOutput {
    pub month: Month,
    pub revenue: i64,
    pub expenses: i64,
    pub revenue_display: String,
    pub expenses_display: String,
}

impl MonthOutput {
    pub fn new(agg: &MonthlyAggregate, display: &DisplayConfig) -> Self {
        Self {
            month: agg.month,
            revenue: agg.revenue,
            expenses: agg.expenses,
            revenue_display: format_amount(agg.revenue, display),
            expenses_display: format_amount(agg.expenses, display),
        }
    }
}

/// JSON output for transactions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    pub id: String,
    pub date: String,
    pub month: Month,
    pub amount: i64,
    pub amount_display: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
}

impl TransactionOutput {
    pub fn new(tx: &Transaction, display: &DisplayConfig) -> Self {
        Self {
            id: tx.id.to_string(),
            date: tx.date.to_string(),
            month: tx.month(),
            amount: tx.amount,
            amount_display: format_amount(tx.amount, display),
            kind: tx.kind,
            description: tx.description.clone(),
        }
    }
}

/// JSON output for a full account snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutput {
    pub user_id: String,
    #[serde(flatten)]
    pub stats: StatsOutput,
    pub monthly_data: Vec<MonthOutput>,
    pub transactions: Vec<TransactionOutput>,
    pub created_at: String,
}

impl AccountOutput {
    pub fn new(account: &Account, display: &DisplayConfig) -> Self {
        Self {
            user_id: account.user_id().to_string(),
            stats: StatsOutput::new(account.stats(), display),
            monthly_data: account
                .monthly_data()
                .iter()
                .map(|m| MonthOutput::new(m, display))
                .collect(),
            transactions: account
                .transactions()
                .iter()
                .map(|t| TransactionOutput::new(t, display))
                .collect(),
            created_at: account.created_at().to_rfc3339(),
        }
    }
}

/// JSON output for one point of the twelve-month series
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPointOutput {
    #[serde(flatten)]
    pub point: MonthlyPoint,
    pub revenue_display: String,
    pub expenses_display: String,
}

impl SeriesPointOutput {
    pub fn new(point: MonthlyPoint, display: &DisplayConfig) -> Self {
        Self {
            revenue_display: format_amount(point.revenue, display),
            expenses_display: format_amount(point.expenses, display),
            point,
        }
    }
}
