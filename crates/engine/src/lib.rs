pub use accounts::Account;
pub use categories::{Category, CategoryKind, STATIC_CATEGORIES, StaticCategory, static_category};
pub use error::EngineError;
pub use ops::{CreateTransactionCmd, Engine, EngineBuilder, SyncUserCmd, UpdateTransactionCmd};
pub use summary::{BalanceSummary, CategoryTotal, MonthlyReport};
pub use transactions::{Transaction, TransactionKind};
pub use users::UserProfile;

mod accounts;
mod categories;
mod error;
mod ops;
mod summary;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
