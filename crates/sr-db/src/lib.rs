pub mod db_status;
pub mod error;
pub mod repositories;

pub use db_status::DbStatus;
pub use error::{DbError, Result};
pub use repositories::reading_repository::ReadingRepository;

/// Embedded migrations, applied at startup and by test harnesses.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
