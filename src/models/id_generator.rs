use std::collections::VecDeque;
use std::sync::Mutex;

use super::Id;

/// Source of fresh transaction ids; swapped for a fixed sequence in tests.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Id;
}

#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> Id {
        Id::new()
    }
}

/// Hands out a pre-seeded sequence of ids, then falls back to UUIDs.
#[derive(Debug, Default)]
pub struct FixedIdGenerator {
    ids: Mutex<VecDeque<Id>>,
}

impl FixedIdGenerator {
    pub fn new(ids: impl IntoIterator<Item = Id>) -> Self {
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
        }
    }

    /// Convenience for tests: `tx-1`, `tx-2`, ... `tx-{count}`.
    pub fn sequential(prefix: &str, count: usize) -> Self {
        Self::new((1..=count).map(|n| Id::from_string(format!("{prefix}-{n}"))))
    }
}

impl IdGenerator for FixedIdGenerator {
    fn new_id(&self) -> Id {
        self.ids
            .lock()
            .expect("fixed id generator lock poisoned")
            .pop_front()
            .unwrap_or_default()
    }
}
