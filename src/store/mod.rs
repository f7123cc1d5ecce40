//! Persistence for ideas and their attached records.
//!
//! Everything lives in one redb database ([`Store`]). Values are
//! bincode-encoded serde structs; keys are plain integers so range scans
//! stay ordered:
//!
//! - `ideas`: idea id → [`Idea`](crate::model::Idea)
//! - `scoring`: idea id → [`ScoringRecord`](crate::model::ScoringRecord)
//! - `weekly`: (idea id, week start millis) → [`WeeklyExecution`](crate::model::WeeklyExecution)
//! - `progress`: (idea id, sequence) → [`ProgressLog`](crate::model::ProgressLog)
//! - `meta`: counter name → last issued value

pub mod durable;

pub use durable::Store;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Encode a record for storage.
pub(crate) fn encode<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization {
        message: format!("encode failed: {e}"),
    })
}

/// Decode a stored record.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization {
        message: format!("decode failed: {e}"),
    })
}

/// Build a `map_err` adapter that wraps any redb error with `context`.
pub(crate) fn redb_err<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> StoreError {
    move |e| StoreError::Redb {
        message: format!("{context} failed: {e}"),
    }
}
