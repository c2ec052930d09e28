use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashEntry {
  pub path: String,
  pub hash: String,
}

/// Ordered mapping of relative path to content hash, plus the stamp of the generation it belongs to.
#[derive(Debug, Clone, Default)]
pub struct HashList {
  pub(crate) stamp: Option<String>,
  pub(crate) entries: Vec<HashEntry>,
  pub(crate) index: HashMap<String, usize>,
}
