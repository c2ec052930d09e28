use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::structures::{Error, Events, HashList, Manifest, UpdateEvent};
use crate::traits::{HashListStore, PersistenceContext};

/// Deletes every tracked file that is no longer part of the distribution, in any tag.
/// Files that were never tracked are left alone. Returns the amount of removed entries.
pub(crate) fn remove_unversioned(
  root: &Path,
  local: &HashList,
  common: &HashList,
  manifest: &Manifest,
  store: &mut dyn HashListStore,
  events: &Events,
) -> Result<usize, Error> {
  let versioned: HashSet<&str> = common.iter().map(|entry| entry.path.as_str())
    .chain(manifest.all_files().map(|file| file.path.as_str()))
    .collect();

  let mut removed = 0;
  for entry in local.iter().filter(|entry| !versioned.contains(entry.path.as_str())) {
    let file = root.join(&entry.path);
    match std::fs::remove_file(&file) {
      Ok(()) => info!("Remove file: {}", file.display()),
      Err(error) if error.kind() == std::io::ErrorKind::NotFound => {},
      Err(error) => return Err(error).persistence_context(&file),
    }
    store.remove_entry(&entry.path)?;
    events.emit(UpdateEvent::FileRemoved { path: entry.path.clone() });
    removed += 1;
  }
  Ok(removed)
}
