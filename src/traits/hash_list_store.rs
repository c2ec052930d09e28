use crate::structures::{Error, HashList};

/// Persisted record of the last confirmed local state.
///
/// Every commit must be atomic: after a crash the store holds either the previous or the new value
/// for an entry, never a partially written list.
pub trait HashListStore: Send {
  fn load(&mut self) -> Result<HashList, Error>;
  fn commit_entry(&mut self, path: &str, hash: &str) -> Result<(), Error>;
  /// Records several `(path, hash)` pairs in one atomic write
  fn commit_entries(&mut self, entries: &[(&str, &str)]) -> Result<(), Error>;
  fn remove_entry(&mut self, path: &str) -> Result<(), Error>;
  fn commit_stamp(&mut self, stamp: &str) -> Result<(), Error>;
}
