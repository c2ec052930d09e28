use std::collections::BTreeSet;

use crate::structures::{Manifest, RecordedStamp};

impl RecordedStamp {
  /// Reads `3` as covering every tag and `3 [client,test]` as covering only the listed ones
  pub fn parse(text: &str) -> Self {
    let text = text.trim();
    let scoped = text.strip_suffix(']')
      .and_then(|rest| rest.rsplit_once(" ["))
      .map(|(stamp, tags)| (stamp.trim(), tags.split(',').map(str::trim).filter(|tag| !tag.is_empty()).map(str::to_string).collect()));
    match scoped {
      Some((stamp, tags)) => Self { stamp: stamp.to_string(), tags: Some(tags) },
      None => Self { stamp: text.to_string(), tags: None },
    }
  }

  pub fn stamp(&self) -> &str {
    &self.stamp
  }

  /// Whether a run over `scope` (every tag when `None`) has nothing left to do for `remote_stamp`
  pub fn covers(&self, remote_stamp: &str, scope: Option<&BTreeSet<String>>) -> bool {
    if self.stamp != remote_stamp {
      return false;
    }
    match (&self.tags, scope) {
      (None, _) => true,
      (Some(_), None) => false,
      (Some(covered), Some(scope)) => scope.is_subset(covered),
    }
  }

  /// What to record once a run over `scope` completed. Tags brought up to date earlier for the same stamp
  /// stay covered; once every declared tag is, the plain stamp is recorded.
  pub fn after_run(previous: Option<&RecordedStamp>, remote_stamp: &str, scope: Option<&BTreeSet<String>>, manifest: &Manifest) -> Self {
    let mut covered = match scope {
      Some(scope) => scope.clone(),
      None => return Self { stamp: remote_stamp.to_string(), tags: None },
    };
    if let Some(previous) = previous.filter(|previous| previous.stamp == remote_stamp) {
      match &previous.tags {
        Some(tags) => covered.extend(tags.iter().cloned()),
        None => return Self { stamp: remote_stamp.to_string(), tags: None },
      }
    }
    let complete = manifest.tags().all(|tag| covered.contains(tag));
    Self { stamp: remote_stamp.to_string(), tags: (!complete).then_some(covered) }
  }
}

impl std::fmt::Display for RecordedStamp {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match &self.tags {
      Some(tags) => write!(f, "{} [{}]", self.stamp, tags.iter().cloned().collect::<Vec<_>>().join(",")),
      None => write!(f, "{}", self.stamp),
    }
  }
}
