//! List store port - document store abstraction

use crate::domain::result::Result;
use crate::domain::List;

/// Per-user list persistence.
///
/// Implementations (adapters) provide the actual storage: the local
/// DuckDB file or the remote document store. The contract is
/// deliberately small: whole-list upserts keyed by list id
/// (last write wins), per-user retrieval, and per-user bulk delete.
pub trait ListStore: Send + Sync {
    /// Return every list owned by `user_id`. Order is unspecified;
    /// callers sort.
    fn list_all(&self, user_id: &str) -> Result<Vec<List>>;

    /// Idempotent upsert keyed by `list.id`. The list is written as an
    /// atomic whole; there is no per-item merge.
    fn put(&self, list: &List) -> Result<()>;

    /// Delete every list owned by `user_id`. All-or-nothing from the
    /// caller's perspective: on error no partial result is exposed.
    fn delete_all(&self, user_id: &str) -> Result<()>;
}
