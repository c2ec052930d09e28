use std::sync::{Arc, Mutex};

use crate::structures::HashList;

/// A hash list store that never touches the disk. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  pub(crate) list: Arc<Mutex<HashList>>,
}
