use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::structures::{Error, FileStore, HashList};
use crate::traits::{HashListStore, PersistenceContext};

pub const HASH_LIST_FILE: &str = "hashlist.dat";
pub const STAMP_FILE: &str = "hashlist.ver";

impl FileStore {
  pub fn new(directory: impl Into<PathBuf>) -> Self {
    Self {
      directory: directory.into(),
      current: None,
    }
  }

  pub fn list_path(&self) -> PathBuf {
    self.directory.join(HASH_LIST_FILE)
  }

  pub fn stamp_path(&self) -> PathBuf {
    self.directory.join(STAMP_FILE)
  }

  fn read(&self) -> Result<HashList, Error> {
    let list_path = self.list_path();
    let mut list = match read_optional(&list_path)? {
      Some(text) => HashList::parse(&text)?,
      None => HashList::new(),
    };
    let stamp = read_optional(&self.stamp_path())?
      .map(|text| text.trim().to_string())
      .filter(|stamp| !stamp.is_empty());
    list.set_stamp(stamp);
    debug!("Loaded {} entries from {}", list.len(), list_path.display());
    Ok(list)
  }

  fn current(&mut self) -> Result<&mut HashList, Error> {
    if self.current.is_none() {
      self.current = Some(self.read()?);
    }
    Ok(self.current.get_or_insert_with(HashList::new))
  }

  fn write_list(&mut self) -> Result<(), Error> {
    let path = self.list_path();
    let text = self.current()?.to_text();
    write_atomically(&path, text.as_bytes())
  }
}

impl HashListStore for FileStore {
  fn load(&mut self) -> Result<HashList, Error> {
    let list = self.read()?;
    self.current = Some(list.clone());
    Ok(list)
  }

  #[instrument(skip(self))]
  fn commit_entry(&mut self, path: &str, hash: &str) -> Result<(), Error> {
    self.current()?.insert(path, hash);
    self.write_list()
  }

  #[instrument(skip(self, entries), fields(entries = entries.len()))]
  fn commit_entries(&mut self, entries: &[(&str, &str)]) -> Result<(), Error> {
    if entries.is_empty() {
      return Ok(());
    }
    let current = self.current()?;
    for (path, hash) in entries {
      current.insert(path, hash);
    }
    self.write_list()
  }

  #[instrument(skip(self))]
  fn remove_entry(&mut self, path: &str) -> Result<(), Error> {
    if self.current()?.remove(path).is_some() {
      self.write_list()?;
    }
    Ok(())
  }

  #[instrument(skip(self))]
  fn commit_stamp(&mut self, stamp: &str) -> Result<(), Error> {
    write_atomically(&self.stamp_path(), format!("{}\n", stamp).as_bytes())?;
    self.current()?.set_stamp(Some(stamp.to_string()));
    Ok(())
  }
}

fn read_optional(path: &Path) -> Result<Option<String>, Error> {
  match std::fs::read_to_string(path) {
    Ok(text) => Ok(Some(text)),
    Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
    Err(error) => Err(error).persistence_context(path),
  }
}

/// Writes next to the target and renames over it, so readers only ever see the old or the new contents
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), Error> {
  if let Some(parent) = path.parent() {
    std::fs::DirBuilder::new().recursive(true).create(parent).persistence_context(parent)?;
  }
  let mut temporary = path.as_os_str().to_owned();
  temporary.push(".tmp");
  let temporary = PathBuf::from(temporary);

  let mut file = std::fs::File::create(&temporary).persistence_context(&temporary)?;
  file.write_all(contents).persistence_context(&temporary)?;
  file.sync_all().persistence_context(&temporary)?;
  drop(file);
  std::fs::rename(&temporary, path).persistence_context(path)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_files_load_as_an_empty_list() {
    let directory = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(directory.path());
    let list = store.load().unwrap();
    assert!(list.is_empty());
    assert_eq!(list.stamp(), None);
  }

  #[test]
  fn commits_survive_a_reload() {
    let directory = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(directory.path());
    store.commit_entry("a.bin", "01").unwrap();
    store.commit_entry("data/b.bin", "02").unwrap();
    store.commit_entry("a.bin", "03").unwrap();
    store.remove_entry("data/b.bin").unwrap();
    store.commit_stamp("7").unwrap();

    let reloaded = FileStore::new(directory.path()).load().unwrap();
    assert_eq!(reloaded.get("a.bin"), Some("03"));
    assert_eq!(reloaded.get("data/b.bin"), None);
    assert_eq!(reloaded.stamp(), Some("7"));
    assert_eq!(std::fs::read_to_string(directory.path().join(HASH_LIST_FILE)).unwrap(), "a.bin=03\n");
    assert!(!directory.path().join("hashlist.dat.tmp").exists());
  }

  #[test]
  fn batch_commit_keeps_existing_entries() {
    let directory = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(directory.path());
    store.commit_entry("a.bin", "01").unwrap();
    store.commit_entries(&[("b.bin", "02"), ("a.bin", "03")]).unwrap();
    store.commit_entries(&[]).unwrap();

    let reloaded = FileStore::new(directory.path()).load().unwrap();
    assert_eq!(reloaded.to_text(), "a.bin=03\nb.bin=02\n");
  }

  #[test]
  fn a_leftover_temporary_file_does_not_affect_the_committed_list() {
    let directory = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(directory.path());
    store.commit_entry("a.bin", "01").unwrap();
    std::fs::write(directory.path().join("hashlist.dat.tmp"), "a.bin=FF\n").unwrap();

    let reloaded = FileStore::new(directory.path()).load().unwrap();
    assert_eq!(reloaded.get("a.bin"), Some("01"));
  }
}
