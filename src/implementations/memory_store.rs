use std::path::PathBuf;

use crate::structures::{Error, HashList, MemoryStore};
use crate::traits::HashListStore;

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_list(list: HashList) -> Self {
    Self {
      list: std::sync::Arc::new(std::sync::Mutex::new(list)),
    }
  }

  /// A copy of the list as it is right now
  pub fn snapshot(&self) -> HashList {
    self.list.lock().map(|list| list.clone()).unwrap_or_default()
  }

  fn update(&self, change: impl FnOnce(&mut HashList)) -> Result<(), Error> {
    let mut list = self.list.lock().map_err(|_| {
      Error::Persistence(PathBuf::from("<memory>"), std::io::Error::new(std::io::ErrorKind::Other, "hash list lock poisoned"))
    })?;
    change(&mut list);
    Ok(())
  }
}

impl HashListStore for MemoryStore {
  fn load(&mut self) -> Result<HashList, Error> {
    Ok(self.snapshot())
  }

  fn commit_entry(&mut self, path: &str, hash: &str) -> Result<(), Error> {
    self.update(|list| list.insert(path, hash))
  }

  fn commit_entries(&mut self, entries: &[(&str, &str)]) -> Result<(), Error> {
    self.update(|list| {
      for (path, hash) in entries {
        list.insert(path, hash);
      }
    })
  }

  fn remove_entry(&mut self, path: &str) -> Result<(), Error> {
    self.update(|list| { list.remove(path); })
  }

  fn commit_stamp(&mut self, stamp: &str) -> Result<(), Error> {
    self.update(|list| list.set_stamp(Some(stamp.to_string())))
  }
}
