mod account;
mod id;
mod id_generator;
mod month;
mod monthly;
mod transaction;
mod transaction_log;

pub use account::{Account, AccountStats};
pub use id::{Id, IdError};
pub use id_generator::{FixedIdGenerator, IdGenerator, UuidIdGenerator};
pub use month::{Month, ParseMonthError};
pub use monthly::{MonthlyAggregate, MonthlyData};
pub use transaction::{
    parse_transaction_date, Transaction, TransactionDraft, TransactionFields, TransactionKind,
    MAX_AMOUNT,
};
pub use transaction_log::{DuplicateTransactionId, TransactionLog};
