use std::collections::BTreeSet;

/// Contents of `hashlist.ver`: the stamp of the last completed run and, when that run was restricted to
/// some tags, the tags it brought up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStamp {
  pub(crate) stamp: String,
  /// `None` when every tag is covered
  pub(crate) tags: Option<BTreeSet<String>>,
}
