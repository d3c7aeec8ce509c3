//! SQLite implementation of the item store.

mod item_store;

pub use item_store::SqliteItemStore;

use crate::storage::StoreError;

/// SQLite primary result codes used for classification.
mod codes {
    pub const BUSY: i64 = 5;
    pub const LOCKED: i64 = 6;
    pub const FULL: i64 = 13;
    pub const CANTOPEN: i64 = 14;
    pub const TOOBIG: i64 = 18;
    pub const CONSTRAINT: i64 = 19;
    pub const MISMATCH: i64 = 20;
}

/// Map an SQLite (possibly extended) result code onto the store taxonomy.
fn classify_result_code(code: i64, message: String) -> StoreError {
    // Extended codes carry the primary code in the low byte.
    match code & 0xff {
        codes::BUSY | codes::LOCKED => StoreError::Throttled(message),
        codes::FULL | codes::CANTOPEN => StoreError::Unavailable(message),
        codes::TOOBIG | codes::CONSTRAINT | codes::MISMATCH => StoreError::InvalidInput(message),
        _ => StoreError::Unknown(message),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code().and_then(|c| c.parse::<i64>().ok()) {
                    Some(code) => classify_result_code(code, message),
                    None => StoreError::Unknown(message),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Unknown(other.to_string()),
        }
    }
}
