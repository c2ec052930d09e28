use std::collections::BTreeMap;

use crate::structures::{FileEntry, Version};

/// A parsed version descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
  pub(crate) versions: Vec<Version>,
  /// File entries per tag, in declaration order
  pub(crate) files: BTreeMap<String, Vec<FileEntry>>,
}
