use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::{Id, IdGenerator, Month};

/// Closed classification that decides the sign of a transaction's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Revenue,
    Expense,
}

impl TransactionKind {
    /// Sign applied to the running balance: revenue adds, expense subtracts.
    pub fn balance_sign(self) -> i64 {
        match self {
            TransactionKind::Revenue => 1,
            TransactionKind::Expense => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Revenue => "revenue",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(TransactionKind::Revenue),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(ValidationError::InvalidKind(s.to_string())),
        }
    }
}

/// Largest accepted amount, in minor units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Validated, replaceable part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    pub date: NaiveDate,
    /// Positive magnitude in minor units; `kind` carries the sign.
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: String,
}

impl TransactionFields {
    pub fn new(
        date: NaiveDate,
        amount: i64,
        kind: TransactionKind,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if !(1..=MAX_AMOUNT).contains(&amount) {
            return Err(ValidationError::InvalidAmount(amount.to_string()));
        }
        Ok(Self {
            date,
            amount,
            kind,
            description: description.into(),
        })
    }
}

/// A dated, typed ledger entry owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new_with_generator(ids: &dyn IdGenerator, fields: TransactionFields) -> Self {
        Self {
            id: ids.new_id(),
            date: fields.date,
            amount: fields.amount,
            kind: fields.kind,
            description: fields.description,
        }
    }

    /// Same identity, every other field replaced.
    pub fn with_fields(&self, fields: TransactionFields) -> Self {
        Self {
            id: self.id.clone(),
            date: fields.date,
            amount: fields.amount,
            kind: fields.kind,
            description: fields.description,
        }
    }

    pub fn month(&self) -> Month {
        Month::of(self.date)
    }

    /// Contribution to the running balance.
    pub fn signed_amount(&self) -> i64 {
        self.kind.balance_sign() * self.amount
    }
}

/// Raw mutation input as received from a caller, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(default)]
    pub date: Option<String>,
    /// Number or numeric string; anything else fails validation.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        date: impl Into<String>,
        amount: impl Into<serde_json::Value>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            date: Some(date.into()),
            amount: Some(amount.into()),
            kind: Some(kind.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<TransactionFields, ValidationError> {
        let amount = match &self.amount {
            None | Some(serde_json::Value::Null) => {
                return Err(ValidationError::MissingField("amount"))
            }
            Some(value) => parse_amount(value)?,
        };
        let kind = self
            .kind
            .as_deref()
            .ok_or(ValidationError::MissingField("type"))?
            .parse::<TransactionKind>()?;
        let date = parse_transaction_date(
            self.date
                .as_deref()
                .ok_or(ValidationError::MissingField("date"))?,
        )?;

        TransactionFields::new(date, amount, kind, self.description.clone().unwrap_or_default())
    }
}

fn parse_amount(value: &serde_json::Value) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(value.to_string());
    let amount = match value {
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => {
                let f = n.as_f64().ok_or_else(invalid)?;
                if f.fract() != 0.0 || f > i64::MAX as f64 || f < i64::MIN as f64 {
                    return Err(invalid());
                }
                f as i64
            }
        },
        serde_json::Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    if !(1..=MAX_AMOUNT).contains(&amount) {
        return Err(invalid());
    }
    Ok(amount)
}

/// Canonical calendar date of a transaction.
///
/// Plain `YYYY-MM-DD` is taken as-is. Timestamps carrying an offset are
/// converted to UTC first, so month attribution never depends on the host's
/// local timezone.
pub fn parse_transaction_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}
