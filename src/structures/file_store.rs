use std::path::PathBuf;

use crate::structures::HashList;

/// Keeps the local hash list as `hashlist.dat` and `hashlist.ver` inside the installation directory.
#[derive(Debug)]
pub struct FileStore {
  pub(crate) directory: PathBuf,
  pub(crate) current: Option<HashList>,
}
