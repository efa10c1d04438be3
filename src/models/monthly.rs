use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

use super::{Month, TransactionKind};

/// Revenue and expense rollup for one month label, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub month: Month,
    pub revenue: i64,
    pub expenses: i64,
}

impl MonthlyAggregate {
    pub fn zero(month: Month) -> Self {
        Self {
            month,
            revenue: 0,
            expenses: 0,
        }
    }

    /// Copy of `self` with `signed_amount` added to the side selected by `kind`,
    /// or `None` on overflow. No clamping: a negative result means a caller
    /// reverted something it never applied.
    pub fn with_delta(self, kind: TransactionKind, signed_amount: i64) -> Option<Self> {
        Some(match kind {
            TransactionKind::Revenue => Self {
                revenue: self.revenue.checked_add(signed_amount)?,
                ..self
            },
            TransactionKind::Expense => Self {
                expenses: self.expenses.checked_add(signed_amount)?,
                ..self
            },
        })
    }

    /// Sum of two aggregates for the same month. Saturates, so a corrupt
    /// stored document loads and then shows up in an audit.
    pub fn merged(self, other: &MonthlyAggregate) -> Self {
        Self {
            revenue: self.revenue.saturating_add(other.revenue),
            expenses: self.expenses.saturating_add(other.expenses),
            ..self
        }
    }

    pub fn is_zero(&self) -> bool {
        self.revenue == 0 && self.expenses == 0
    }
}

/// Per-account monthly rollups, unique by month and kept in insertion order.
///
/// Serializes as a plain list; the month index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyData {
    entries: Vec<MonthlyAggregate>,
    by_month: HashMap<Month, usize>,
}

impl MonthlyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroed entries for January through `last`, inclusive.
    pub fn seeded_through(last: Month) -> Self {
        Self::from_aggregates(last.through().map(MonthlyAggregate::zero))
    }

    /// Build from a list that may repeat a month; repeats are merged into the
    /// first occurrence.
    pub fn from_aggregates(aggregates: impl IntoIterator<Item = MonthlyAggregate>) -> Self {
        let mut data = Self::new();
        for aggregate in aggregates {
            data.merge(&aggregate);
        }
        data
    }

    pub fn get(&self, month: Month) -> Option<&MonthlyAggregate> {
        self.by_month.get(&month).map(|&idx| &self.entries[idx])
    }

    /// Entry for `month` or an all-zero aggregate if absent.
    pub fn get_or_zero(&self, month: Month) -> MonthlyAggregate {
        self.get(month)
            .copied()
            .unwrap_or_else(|| MonthlyAggregate::zero(month))
    }

    pub fn contains(&self, month: Month) -> bool {
        self.by_month.contains_key(&month)
    }

    /// Position of `month`, appending a zeroed entry first if absent.
    fn ensure(&mut self, month: Month) -> usize {
        if let Some(&idx) = self.by_month.get(&month) {
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push(MonthlyAggregate::zero(month));
        self.by_month.insert(month, idx);
        idx
    }

    /// Add a signed amount to one side of `month`, creating the entry lazily.
    /// On overflow nothing changes, not even the lazy entry.
    pub fn apply(
        &mut self,
        month: Month,
        kind: TransactionKind,
        signed_amount: i64,
    ) -> Result<(), ValidationError> {
        let next = self
            .get_or_zero(month)
            .with_delta(kind, signed_amount)
            .ok_or(ValidationError::TotalsOverflow(signed_amount))?;
        let idx = self.ensure(month);
        self.entries[idx] = next;
        Ok(())
    }

    /// Add another aggregate's values into the entry for its month.
    pub fn merge(&mut self, other: &MonthlyAggregate) {
        let idx = self.ensure(other.month);
        self.entries[idx] = self.entries[idx].merged(other);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyAggregate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MonthlyData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MonthlyData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<MonthlyAggregate>::deserialize(deserializer)?;
        Ok(Self::from_aggregates(entries))
    }
}
