use std::collections::{BTreeMap, HashSet};

use crate::functions::normalize_path;
use crate::structures::{FileEntry, Manifest, ParseError, Version};

const VERSIONS_HEADER: &str = "[versions]";

/// A single line of a version descriptor, classified before it is interpreted
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
  Blank,
  Comment,
  SectionHeader(&'a str),
  VersionKeyValue(&'a str, &'a str),
  FileKeyValue(&'a str, &'a str),
  Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
  Versions,
  Files,
}

impl<'a> Line<'a> {
  fn classify(raw: &'a str, section: Section) -> Self {
    let line = raw.trim();
    if line.is_empty() {
      return Line::Blank;
    }
    if line.starts_with('#') || line.starts_with(';') {
      return Line::Comment;
    }
    if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
      if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '[' || c == ']') {
        return Line::Invalid;
      }
      return Line::SectionHeader(name);
    }
    match section {
      Section::Versions => line.split_once('=')
        .map(|(key, value)| Line::VersionKeyValue(key.trim(), value.trim()))
        .unwrap_or(Line::Invalid),
      // Hashes never contain '=', paths might
      Section::Files => line.rsplit_once('=')
        .map(|(path, hash)| Line::FileKeyValue(path.trim(), hash.trim()))
        .unwrap_or(Line::Invalid),
    }
  }
}

/// A version whose title, server and tag are still being collected
#[derive(Debug, Default)]
struct PendingVersion {
  title: Option<String>,
  server: Option<String>,
  tag: Option<String>,
}

impl PendingVersion {
  fn is_empty(&self) -> bool {
    self.title.is_none() && self.server.is_none() && self.tag.is_none()
  }

  fn missing(&self) -> Vec<&'static str> {
    [("title", &self.title), ("server", &self.server), ("tag", &self.tag)]
      .into_iter()
      .filter(|(_, value)| value.is_none())
      .map(|(name, _)| name)
      .collect()
  }

  fn take_complete(&mut self) -> Option<Version> {
    if self.title.is_some() && self.server.is_some() && self.tag.is_some() {
      let pending = std::mem::take(self);
      return Some(Version {
        title: pending.title?,
        server: pending.server?,
        tag: pending.tag?,
      });
    }
    None
  }
}

#[derive(Debug, Default)]
struct Parser {
  versions: Vec<Version>,
  pending: PendingVersion,
  files: BTreeMap<String, Vec<FileEntry>>,
  declared: HashSet<(String, String)>,
  current_tag: Option<String>,
}

impl Parser {
  fn version_value(&mut self, line: usize, text: &str, key: &str, value: &str) -> Result<(), ParseError> {
    let slot = match key {
      "title" => &mut self.pending.title,
      "server" => &mut self.pending.server,
      "tag" => &mut self.pending.tag,
      _ => return Err(ParseError::InvalidVersionLine(line, text.to_string())),
    };
    if value.is_empty() {
      return Err(ParseError::InvalidVersionValue(line, text.to_string()));
    }
    if slot.is_some() {
      // The same key twice means the previous version ended before it was complete
      return Err(ParseError::IncompleteVersion(line, self.pending.missing()));
    }
    *slot = Some(value.to_string());

    if let Some(version) = self.pending.take_complete() {
      self.push_version(line, version)?;
    }
    Ok(())
  }

  fn push_version(&mut self, line: usize, version: Version) -> Result<(), ParseError> {
    if self.versions.iter().any(|existing| existing.title == version.title) {
      return Err(ParseError::DuplicateTitle(line, version.title));
    }
    if self.versions.iter().any(|existing| existing.server == version.server) {
      return Err(ParseError::DuplicateServer(line, version.server));
    }
    if self.versions.iter().any(|existing| existing.tag == version.tag) {
      return Err(ParseError::DuplicateTag(line, version.tag));
    }
    self.versions.push(version);
    Ok(())
  }

  fn ensure_no_pending(&self, line: usize) -> Result<(), ParseError> {
    if self.pending.is_empty() {
      Ok(())
    } else {
      Err(ParseError::IncompleteVersion(line, self.pending.missing()))
    }
  }

  fn start_section(&mut self, line: usize, name: &str) -> Result<(), ParseError> {
    self.ensure_no_pending(line)?;
    if !self.versions.iter().any(|version| version.tag == name) {
      return Err(ParseError::InvalidTagName(line, name.to_string()));
    }
    if self.files.contains_key(name) {
      return Err(ParseError::DuplicateSection(line, name.to_string()));
    }
    self.files.insert(name.to_string(), Vec::new());
    self.current_tag = Some(name.to_string());
    Ok(())
  }

  fn file(&mut self, line: usize, text: &str, path: &str, hash: &str) -> Result<(), ParseError> {
    let tag = match &self.current_tag {
      Some(tag) => tag.clone(),
      None => return Err(ParseError::InvalidFileLine(line, text.to_string())),
    };
    if path.is_empty() || hash.is_empty() || hash.contains(char::is_whitespace) {
      return Err(ParseError::InvalidFileLine(line, text.to_string()));
    }
    let path = normalize_path(line, path)?;
    if !self.declared.insert((tag.clone(), path.clone())) {
      return Err(ParseError::DuplicateFile { line, path, tag });
    }
    self.files.entry(tag.clone()).or_default().push(FileEntry { tag, path, hash: hash.to_string() });
    Ok(())
  }

  fn finish(self, last_line: usize) -> Result<Manifest, ParseError> {
    self.ensure_no_pending(last_line)?;
    for version in &self.versions {
      if self.files.get(&version.tag).map_or(true, |entries| entries.is_empty()) {
        return Err(ParseError::UnreferencedTag(version.tag.clone()));
      }
    }
    Ok(Manifest {
      versions: self.versions,
      files: self.files,
    })
  }
}

impl Manifest {
  /// Parses the text of a version descriptor.
  ///
  /// The document is either accepted as a whole or rejected with the first structural problem found,
  /// a partially parsed manifest is never returned.
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().map(|line| line.strip_suffix('\r').unwrap_or(line));

    let header = lines.next().unwrap_or_default();
    if header != VERSIONS_HEADER {
      return Err(ParseError::BadHeader(header.to_string()));
    }

    let mut parser = Parser::default();
    let mut section = Section::Versions;
    let mut last_line = 1;
    for (index, text) in lines.enumerate() {
      let line = index + 2;
      last_line = line;
      match Line::classify(text, section) {
        Line::Blank | Line::Comment => {},
        Line::SectionHeader(name) => {
          parser.start_section(line, name)?;
          section = Section::Files;
        },
        Line::VersionKeyValue(key, value) => parser.version_value(line, text.trim(), key, value)?,
        Line::FileKeyValue(path, hash) => parser.file(line, text.trim(), path, hash)?,
        Line::Invalid => return Err(match section {
          Section::Versions => ParseError::InvalidVersionLine(line, text.trim().to_string()),
          Section::Files => ParseError::InvalidFileLine(line, text.trim().to_string()),
        }),
      }
    }
    parser.finish(last_line)
  }

  pub fn versions(&self) -> &[Version] {
    &self.versions
  }

  pub fn version(&self, tag: &str) -> Option<&Version> {
    self.versions.iter().find(|version| version.tag == tag)
  }

  /// Tags in declaration order
  pub fn tags(&self) -> impl Iterator<Item = &str> {
    self.versions.iter().map(|version| version.tag.as_str())
  }

  pub fn files(&self, tag: &str) -> &[FileEntry] {
    self.files.get(tag).map(Vec::as_slice).unwrap_or_default()
  }

  /// Every file entry, grouped per tag in the order the versions were declared
  pub fn all_files(&self) -> impl Iterator<Item = &FileEntry> {
    self.tags().flat_map(move |tag| self.files(tag).iter())
  }
}
