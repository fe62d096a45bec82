//! Position Repository Trait
//!
//! Storage seam for the ordered record list. The application state only talks
//! to this trait, so the JSON backing file can be swapped for an in-memory
//! store in tests.

use crate::domain::entities::position::PositionRecord;
use crate::domain::errors::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

pub trait PositionRepository: Send + Sync {
    /// Human-readable location of the store, for logs and diagnostics.
    fn location(&self) -> String;

    /// Read the full ordered sequence.
    ///
    /// A store that does not exist yet is empty, not an error. Unreadable or
    /// corrupt content is reported as an error so callers can tell the two
    /// apart.
    fn load(&self) -> StoreResult<Vec<PositionRecord>>;

    /// Replace the stored sequence with `records`.
    fn save(&self, records: &[PositionRecord]) -> StoreResult<()>;

    /// Forget any cached copy so the next `load` reads the store again.
    fn invalidate(&self) {}
}
