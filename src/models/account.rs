use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

use super::{Id, MonthlyData, Transaction, TransactionLog};

/// Per-user ledger root: running totals, monthly rollups and the
/// transaction log. Loaded, mutated and saved as one unit.
///
/// Totals and rollups change only through [`crate::ledger`]; the fields are
/// crate-private so nothing else can break the balance identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub(crate) user_id: Id,
    pub(crate) current_balance: i64,
    pub(crate) total_revenue: i64,
    pub(crate) total_expenses: i64,
    #[serde(default)]
    pub(crate) monthly_data: MonthlyData,
    #[serde(default)]
    pub(crate) transactions: TransactionLog,
    pub(crate) created_at: DateTime<Utc>,
}

/// Balance summary without the monthly breakdown or log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub current_balance: i64,
    pub total_revenue: i64,
    pub total_expenses: i64,
}

impl Account {
    /// Empty account with no monthly entries.
    pub fn new(user_id: Id, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            current_balance: 0,
            total_revenue: 0,
            total_expenses: 0,
            monthly_data: MonthlyData::new(),
            transactions: TransactionLog::new(),
            created_at,
        }
    }

    /// Fresh account as produced by first-time setup: zero balance and,
    /// when `seed_months` is set, zeroed rollups for January through the
    /// clock's current month.
    pub fn open(user_id: Id, clock: &dyn Clock, seed_months: bool) -> Self {
        let now = clock.now();
        let mut account = Self::new(user_id, now);
        if seed_months {
            account.monthly_data = MonthlyData::seeded_through(clock.current_month());
        }
        account
    }

    pub fn user_id(&self) -> &Id {
        &self.user_id
    }

    pub fn current_balance(&self) -> i64 {
        self.current_balance
    }

    pub fn total_revenue(&self) -> i64 {
        self.total_revenue
    }

    pub fn total_expenses(&self) -> i64 {
        self.total_expenses
    }

    pub fn monthly_data(&self) -> &MonthlyData {
        &self.monthly_data
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    pub fn transaction(&self, id: &Id) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn stats(&self) -> AccountStats {
        AccountStats {
            current_balance: self.current_balance,
            total_revenue: self.total_revenue,
            total_expenses: self.total_expenses,
        }
    }
}
