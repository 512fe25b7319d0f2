//! spendlens-core: shared transaction model for the spending analyzer.

pub mod fmt;
pub mod month;
pub mod transaction;

pub use fmt::{money, money0};
pub use month::MonthKey;
pub use transaction::{SpendClass, Source, Transaction};
