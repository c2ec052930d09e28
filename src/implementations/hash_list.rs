use crate::functions::normalize_path;
use crate::structures::{HashEntry, HashList, ParseError};

impl HashList {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses a `path=hash` listing. Blank lines and `#` comments are skipped.
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut list = Self::new();
    for (index, line) in text.lines().enumerate() {
      let line_number = index + 1;
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let (path, hash) = line.rsplit_once('=')
        .map(|(path, hash)| (path.trim(), hash.trim()))
        .filter(|(path, hash)| !path.is_empty() && !hash.is_empty() && !hash.contains(char::is_whitespace))
        .ok_or_else(|| ParseError::InvalidHashListLine(line_number, line.to_string()))?;
      let path = normalize_path(line_number, path)?;
      if list.get(&path).is_some() {
        return Err(ParseError::DuplicateHashListPath(line_number, path));
      }
      list.insert(&path, hash);
    }
    Ok(list)
  }

  /// Serializes the entries in their current order, the inverse of `parse`
  pub fn to_text(&self) -> String {
    self.entries.iter().map(|entry| format!("{}={}\n", entry.path, entry.hash)).collect()
  }

  pub fn stamp(&self) -> Option<&str> {
    self.stamp.as_deref()
  }

  pub fn set_stamp(&mut self, stamp: Option<String>) {
    self.stamp = stamp;
  }

  pub fn with_stamp(mut self, stamp: &str) -> Self {
    self.stamp = Some(stamp.to_string());
    self
  }

  pub fn get(&self, path: &str) -> Option<&str> {
    self.index.get(path).map(|position| self.entries[*position].hash.as_str())
  }

  /// Replaces the hash of a known path in place, or appends a new entry
  pub fn insert(&mut self, path: &str, hash: &str) {
    match self.index.get(path) {
      Some(position) => self.entries[*position].hash = hash.to_string(),
      None => {
        self.index.insert(path.to_string(), self.entries.len());
        self.entries.push(HashEntry { path: path.to_string(), hash: hash.to_string() });
      },
    }
  }

  pub fn remove(&mut self, path: &str) -> Option<String> {
    let position = self.index.remove(path)?;
    let removed = self.entries.remove(position);
    for entry in &self.entries[position..] {
      if let Some(index) = self.index.get_mut(&entry.path) {
        *index -= 1;
      }
    }
    Some(removed.hash)
  }

  pub fn iter(&self) -> impl Iterator<Item = &HashEntry> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl PartialEq for HashList {
  fn eq(&self, other: &Self) -> bool {
    self.stamp == other.stamp && self.entries == other.entries
  }
}

impl Eq for HashList { }

impl FromIterator<(String, String)> for HashList {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    let mut list = Self::new();
    for (path, hash) in iter {
      list.insert(&path, &hash);
    }
    list
  }
}

/// Hex digests are compared without regard to case
pub(crate) fn hashes_match(left: &str, right: &str) -> bool {
  left.eq_ignore_ascii_case(right)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_in_declaration_order() {
    let list = HashList::parse("# generated\nb.bin=02\n\na\\c.bin = 01\n").unwrap();
    let paths: Vec<_> = list.iter().map(|entry| entry.path.as_str()).collect();
    assert_eq!(paths, vec!["b.bin", "a/c.bin"]);
    assert_eq!(list.get("a/c.bin"), Some("01"));
    assert_eq!(list.stamp(), None);
  }

  #[test]
  fn rejects_malformed_and_duplicate_lines() {
    assert_eq!(HashList::parse("a.bin\n"), Err(ParseError::InvalidHashListLine(1, "a.bin".to_string())));
    assert_eq!(HashList::parse("a.bin=01\na.bin=02\n"), Err(ParseError::DuplicateHashListPath(2, "a.bin".to_string())));
    assert_eq!(HashList::parse("/a.bin=01\n"), Err(ParseError::UnsafePath(1, "/a.bin".to_string())));
  }

  #[test]
  fn text_form_parses_back_to_the_same_entries() {
    let list: HashList = vec![
      ("z.bin".to_string(), "0A".to_string()),
      ("data/y.bin".to_string(), "0B".to_string()),
    ].into_iter().collect();
    assert_eq!(HashList::parse(&list.to_text()).unwrap(), list);
  }

  #[test]
  fn insert_replaces_in_place_and_remove_keeps_index_consistent() {
    let mut list = HashList::new();
    list.insert("a", "1");
    list.insert("b", "2");
    list.insert("c", "3");
    list.insert("a", "9");
    assert_eq!(list.iter().next().map(|entry| entry.hash.as_str()), Some("9"));

    assert_eq!(list.remove("a"), Some("9".to_string()));
    assert_eq!(list.remove("a"), None);
    assert_eq!(list.get("c"), Some("3"));
    list.insert("c", "4");
    assert_eq!(list.get("c"), Some("4"));
    assert_eq!(list.len(), 2);
  }

  #[test]
  fn compares_hashes_ignoring_case() {
    assert!(hashes_match("ABCDEF01", "abcdef01"));
    assert!(!hashes_match("ABCDEF01", "ABCDEF02"));
  }
}
