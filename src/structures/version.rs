/// One update channel declared in the `[versions]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
  /// Display name, unique across the manifest
  pub title: String,
  /// Connection endpoint, unique across the manifest
  pub server: String,
  /// Machine identifier, names the file section belonging to this version
  pub tag: String,
}
