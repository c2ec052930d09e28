use std::path::Path;

use crate::structures::Error;

/// Attaches the path that was being written or read to an io error
pub(crate) trait PersistenceContext<T> {
  fn persistence_context(self, path: &Path) -> Result<T, Error>;
}

impl<T> PersistenceContext<T> for Result<T, std::io::Error> {
  fn persistence_context(self, path: &Path) -> Result<T, Error> {
    self.map_err(|error| {
      tracing::error!("{}: {:?}", path.display(), error);
      Error::Persistence(path.to_path_buf(), error)
    })
  }
}
