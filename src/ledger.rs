//! Ledger reconciliation.
//!
//! Every mutation is expressed through [`apply_delta`]: a transaction's
//! effect is applied with `+amount` and cancelled with `-amount`. Updates
//! revert the old effect in full before applying the new one, because the
//! month, amount and type may all change at once.
//!
//! Functions here work on an in-memory [`Account`] and do no I/O. Callers
//! hand in a scratch copy and persist it afterwards; on any error the copy
//! is untouched.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::models::{
    Account, DuplicateTransactionId, Id, IdGenerator, Month, MonthlyAggregate, Transaction,
    TransactionFields, TransactionKind,
};

/// Add `signed_amount` of `kind` on `date` to the account's totals and to
/// the rollup for the date's month, creating that rollup if needed.
///
/// Revenue moves the balance in the same direction as the amount; expense
/// moves it in the opposite direction. Nothing is clamped. Every new value
/// is computed before any is stored, so on overflow the account is
/// unchanged.
pub fn apply_delta(
    account: &mut Account,
    date: NaiveDate,
    signed_amount: i64,
    kind: TransactionKind,
) -> LedgerResult<()> {
    let overflow = || LedgerError::from(ValidationError::TotalsOverflow(signed_amount));

    let balance = account
        .current_balance
        .checked_add(kind.balance_sign() * signed_amount)
        .ok_or_else(overflow)?;
    let (revenue, expenses) = match kind {
        TransactionKind::Revenue => (
            account
                .total_revenue
                .checked_add(signed_amount)
                .ok_or_else(overflow)?,
            account.total_expenses,
        ),
        TransactionKind::Expense => (
            account.total_revenue,
            account
                .total_expenses
                .checked_add(signed_amount)
                .ok_or_else(overflow)?,
        ),
    };
    account
        .monthly_data
        .apply(Month::of(date), kind, signed_amount)?;

    account.current_balance = balance;
    account.total_revenue = revenue;
    account.total_expenses = expenses;
    Ok(())
}

/// Apply a new transaction's effect and append it to the log.
pub fn add_transaction(
    account: &mut Account,
    ids: &dyn IdGenerator,
    fields: TransactionFields,
) -> LedgerResult<Transaction> {
    let mut tx = Transaction::new_with_generator(ids, fields);
    apply_delta(account, tx.date, tx.amount, tx.kind)?;

    while let Err(DuplicateTransactionId(_)) = account.transactions.push(tx.clone()) {
        tx.id = ids.new_id();
    }
    Ok(tx)
}

/// Replace every field of an existing transaction: revert the old effect,
/// swap the record in place, apply the new effect.
pub fn update_transaction(
    account: &mut Account,
    id: &Id,
    fields: TransactionFields,
) -> LedgerResult<Transaction> {
    let current = account
        .transactions
        .get(id)
        .cloned()
        .ok_or_else(|| LedgerError::TransactionNotFound(id.clone()))?;
    let updated = current.with_fields(fields);

    apply_delta(account, current.date, -current.amount, current.kind)?;
    if let Err(err) = apply_delta(account, updated.date, updated.amount, updated.kind) {
        // Put back exactly what was just reverted.
        apply_delta(account, current.date, current.amount, current.kind)?;
        return Err(err);
    }

    account.transactions.replace(updated.clone());
    Ok(updated)
}

/// Revert a transaction's effect and drop it from the log.
pub fn delete_transaction(account: &mut Account, id: &Id) -> LedgerResult<Transaction> {
    let current = account
        .transactions
        .get(id)
        .cloned()
        .ok_or_else(|| LedgerError::TransactionNotFound(id.clone()))?;

    apply_delta(account, current.date, -current.amount, current.kind)?;
    account.transactions.remove(id);
    Ok(current)
}

/// A place where stored aggregates disagree with the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum Discrepancy {
    CurrentBalance { expected: i64, actual: i64 },
    TotalRevenue { expected: i64, actual: i64 },
    TotalExpenses { expected: i64, actual: i64 },
    Month {
        month: Month,
        expected: MonthlyAggregate,
        actual: Option<MonthlyAggregate>,
    },
}

/// Recompute every aggregate from the log and report mismatches.
///
/// `opening_balance` is the balance the account had before its first
/// transaction (zero for accounts created by [`Account::open`]).
pub fn audit(account: &Account, opening_balance: i64) -> Vec<Discrepancy> {
    // Sums saturate: a stored log too large to add up is reported, not a panic.
    let mut expected: HashMap<Month, MonthlyAggregate> = HashMap::new();
    let mut balance = opening_balance;
    let mut revenue: i64 = 0;
    let mut expenses: i64 = 0;
    for tx in account.transactions.iter() {
        let month = tx.month();
        let agg = expected
            .entry(month)
            .or_insert_with(|| MonthlyAggregate::zero(month));
        balance = balance.saturating_add(tx.signed_amount());
        match tx.kind {
            TransactionKind::Revenue => {
                agg.revenue = agg.revenue.saturating_add(tx.amount);
                revenue = revenue.saturating_add(tx.amount);
            }
            TransactionKind::Expense => {
                agg.expenses = agg.expenses.saturating_add(tx.amount);
                expenses = expenses.saturating_add(tx.amount);
            }
        }
    }

    let mut found = Vec::new();
    if account.current_balance != balance {
        found.push(Discrepancy::CurrentBalance {
            expected: balance,
            actual: account.current_balance,
        });
    }
    if account.total_revenue != revenue {
        found.push(Discrepancy::TotalRevenue {
            expected: revenue,
            actual: account.total_revenue,
        });
    }
    if account.total_expenses != expenses {
        found.push(Discrepancy::TotalExpenses {
            expected: expenses,
            actual: account.total_expenses,
        });
    }

    for month in Month::ALL {
        let want = expected
            .get(&month)
            .copied()
            .unwrap_or_else(|| MonthlyAggregate::zero(month));
        let have = account.monthly_data.get(month).copied();
        let matches = match have {
            Some(have) => have == want,
            // Absent months are fine as long as nothing should be there.
            None => want.is_zero(),
        };
        if !matches {
            found.push(Discrepancy::Month {
                month,
                expected: want,
                actual: have,
            });
        }
    }

    found
}
