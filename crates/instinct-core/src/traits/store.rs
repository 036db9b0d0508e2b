//! Instinct store trait.

use crate::error::InstinctResult;
use crate::types::{Instinct, ListFilter};

/// Persistence backend for instinct records.
///
/// Implementations attach [`Source`](crate::types::Source) to every record
/// they return. Decay is never applied here.
pub trait InstinctStore {
    /// List records matching `filter`, sorted by ID.
    fn list(&self, filter: &ListFilter) -> InstinctResult<Vec<Instinct>>;

    /// Get a single record by ID.
    ///
    /// Returns [`InstinctError::NotFound`](crate::error::InstinctError::NotFound)
    /// when no root holds the ID.
    fn get(&self, id: &str) -> InstinctResult<Instinct>;

    /// Insert or replace a record by ID.
    fn save(&self, instinct: &Instinct) -> InstinctResult<()>;

    /// Whether any root holds `id`.
    ///
    /// Lookup failures other than not-found propagate.
    fn contains(&self, id: &str) -> InstinctResult<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
