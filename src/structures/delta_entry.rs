/// A file whose local state differs from the remote one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEntry {
  pub path: String,
  pub hash: String,
  /// `None` for files listed in the remote hash list, otherwise the tag whose section declared it
  pub tag: Option<String>,
}
