/// A file belonging to a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
  pub tag: String,
  /// Path relative to the installation directory, always using `/`
  pub path: String,
  pub hash: String,
}
