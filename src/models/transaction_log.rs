use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Id, Transaction};

/// Append-ordered transactions with an id -> position index.
///
/// Serializes as a plain list; the index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
    by_id: HashMap<Id, usize>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Duplicate transaction id: {0}")]
pub struct DuplicateTransactionId(pub Id);

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> Result<Self, DuplicateTransactionId> {
        let mut log = Self::new();
        for tx in transactions {
            log.push(tx)?;
        }
        Ok(log)
    }

    pub fn push(&mut self, tx: Transaction) -> Result<(), DuplicateTransactionId> {
        if self.by_id.contains_key(&tx.id) {
            return Err(DuplicateTransactionId(tx.id));
        }
        self.by_id.insert(tx.id.clone(), self.entries.len());
        self.entries.push(tx);
        Ok(())
    }

    pub fn get(&self, id: &Id) -> Option<&Transaction> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Swap in `tx` at the position held by its id, returning the previous
    /// record. `None` (and no change) if the id is unknown.
    pub fn replace(&mut self, tx: Transaction) -> Option<Transaction> {
        let idx = *self.by_id.get(&tx.id)?;
        Some(std::mem::replace(&mut self.entries[idx], tx))
    }

    /// Remove by id, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, id: &Id) -> Option<Transaction> {
        let idx = self.by_id.remove(id)?;
        let removed = self.entries.remove(idx);
        for tx in &self.entries[idx..] {
            if let Some(pos) = self.by_id.get_mut(&tx.id) {
                *pos -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TransactionLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TransactionLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Transaction>::deserialize(deserializer)?;
        Self::from_transactions(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;

    fn tx(id: &str, amount: i64) -> Transaction {
        Transaction {
            id: Id::from_string(id),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount,
            kind: TransactionKind::Revenue,
            description: String::new(),
        }
    }

    fn ids(log: &TransactionLog) -> Vec<&str> {
        log.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn remove_keeps_order_and_index_consistent() {
        let mut log = TransactionLog::from_transactions([tx("a", 1), tx("b", 2), tx("c", 3)]).unwrap();

        let removed = log.remove(&Id::from_string("a")).unwrap();
        assert_eq!(removed.amount, 1);
        assert_eq!(ids(&log), vec!["b", "c"]);
        assert_eq!(log.get(&Id::from_string("c")).map(|t| t.amount), Some(3));
        assert!(log.remove(&Id::from_string("a")).is_none());
    }

    #[test]
    fn replace_keeps_position() {
        let mut log = TransactionLog::from_transactions([tx("a", 1), tx("b", 2)]).unwrap();
        let old = log.replace(tx("a", 10)).unwrap();
        assert_eq!(old.amount, 1);
        assert_eq!(ids(&log), vec!["a", "b"]);
        assert_eq!(log.get(&Id::from_string("a")).map(|t| t.amount), Some(10));
        assert!(log.replace(tx("zzz", 5)).is_none());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut log = TransactionLog::new();
        log.push(tx("a", 1)).unwrap();
        assert_eq!(
            log.push(tx("a", 2)),
            Err(DuplicateTransactionId(Id::from_string("a")))
        );
        let raw = serde_json::to_string(&vec![tx("x", 1), tx("x", 2)]).unwrap();
        assert!(serde_json::from_str::<TransactionLog>(&raw).is_err());
    }
}
