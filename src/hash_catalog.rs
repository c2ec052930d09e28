use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, instrument};

use crate::functions::get_hash;
use crate::implementations::hash_list::hashes_match;
use crate::structures::{DeltaEntry, Error, HashList, Manifest};

/// How the local side of the comparison is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
  /// Trust the persisted hash list for files that exist, hash the others
  Incremental,
  /// Ignore the persisted hash list and hash every file on disk
  RecheckAll,
}

/// The remote state in scope for a run, in download order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashCatalog {
  remote: Vec<DeltaEntry>,
  positions: HashMap<String, usize>,
}

impl HashCatalog {
  /// Files of the remote hash list come first, followed by the files of every tag in `tags`,
  /// taken in the order the manifest declares the tags. An empty `tags` selects every tag.
  pub fn new(common: &HashList, manifest: &Manifest, tags: &[String]) -> Self {
    let mut catalog = Self::default();
    for entry in common.iter() {
      catalog.declare(&entry.path, &entry.hash, None);
    }
    for tag in manifest.tags().filter(|tag| tags.is_empty() || tags.iter().any(|selected| selected == tag)) {
      for file in manifest.files(tag) {
        catalog.declare(&file.path, &file.hash, Some(tag));
      }
    }
    catalog
  }

  /// A later declaration of a path takes over its hash and source but keeps the first position
  fn declare(&mut self, path: &str, hash: &str, tag: Option<&str>) {
    let entry = DeltaEntry {
      path: path.to_string(),
      hash: hash.to_string(),
      tag: tag.map(str::to_string),
    };
    match self.positions.get(path) {
      Some(position) => self.remote[*position] = entry,
      None => {
        self.positions.insert(path.to_string(), self.remote.len());
        self.remote.push(entry);
      },
    }
  }

  pub fn remote(&self) -> &[DeltaEntry] {
    &self.remote
  }

  pub fn contains(&self, path: &str) -> bool {
    self.positions.contains_key(path)
  }

  /// The remote state as a hash list, the shape the local store should have once the update finishes
  pub fn to_hash_list(&self) -> HashList {
    self.remote.iter().map(|entry| (entry.path.clone(), entry.hash.clone())).collect()
  }

  /// Every remote file whose local copy is missing or has a different hash, in remote order.
  /// Files that only exist locally are never part of the delta.
  #[instrument(skip(self, local))]
  pub fn delta(&self, root: &Path, local: &HashList, mode: CheckMode) -> Result<Vec<DeltaEntry>, Error> {
    let mut delta = Vec::new();
    for entry in &self.remote {
      let current = local_hash(root, local, &entry.path, mode)?;
      let up_to_date = current.as_deref().map_or(false, |hash| hashes_match(hash, &entry.hash));
      if !up_to_date {
        debug!("{} needs download (local {:?}, remote {})", entry.path, current, entry.hash);
        delta.push(entry.clone());
      }
    }
    Ok(delta)
  }
}

fn local_hash(root: &Path, local: &HashList, path: &str, mode: CheckMode) -> Result<Option<String>, Error> {
  let file = root.join(path);
  if !file.is_file() {
    return Ok(None);
  }
  if mode == CheckMode::Incremental {
    if let Some(hash) = local.get(path) {
      return Ok(Some(hash.to_string()));
    }
  }
  get_hash(&file).map(Some)
}
