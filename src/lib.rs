pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod ledger;
pub mod models;
pub mod projection;
pub mod service;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
pub use service::LedgerService;
