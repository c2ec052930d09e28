use crate::structures::{Error, NetworkError, ParseError};

impl std::error::Error for ParseError { }

impl std::fmt::Display for ParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::BadHeader(found) => write!(f, "The first line of the file was not: [versions] (found \"{}\")", found),
      Self::InvalidVersionLine(line, text) => write!(f, "Invalid line found in versions section on line {}: {}", line, text),
      Self::InvalidVersionValue(line, text) => write!(f, "Version contains invalid value on line {}: {}", line, text),
      Self::DuplicateTitle(line, value) => write!(f, "Duplicate title value found on line {}: {}", line, value),
      Self::DuplicateServer(line, value) => write!(f, "Duplicate server value found on line {}: {}", line, value),
      Self::DuplicateTag(line, value) => write!(f, "Duplicate tag value found on line {}: {}", line, value),
      Self::IncompleteVersion(line, missing) => write!(f, "Version ending on line {} is missing one or more of: title, server, tag (missing {})", line, missing.join(", ")),
      Self::InvalidTagName(line, name) => write!(f, "Section contains invalid tag name on line {}: {}", line, name),
      Self::DuplicateSection(line, name) => write!(f, "File section for tag '{}' declared again on line {}", name, line),
      Self::InvalidFileLine(line, text) => write!(f, "Invalid line found in file list section on line {}: {}", line, text),
      Self::DuplicateFile { line, path, tag } => write!(f, "Duplicate file '{}' found for tag '{}' on line {}", path, tag, line),
      Self::UnreferencedTag(tag) => write!(f, "Tag '{}' is not referenced by any file", tag),
      Self::UnsafePath(line, path) => write!(f, "Path '{}' on line {} does not stay inside the installation directory", path, line),
      Self::InvalidHashListLine(line, text) => write!(f, "Invalid line found in hash list on line {}: {}", line, text),
      Self::DuplicateHashListPath(line, path) => write!(f, "Duplicate path '{}' found in hash list on line {}", path, line),
      Self::NotUtf8(details) => write!(f, "Document is not valid UTF-8: {}", details),
    }
  }
}

impl std::error::Error for NetworkError { }

impl std::fmt::Display for NetworkError {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::Timeout => write!(f, "Download timeout"),
      Self::HttpStatus(code, reason) => write!(f, "Server returned status code {} {}", code, reason),
      Self::EmptyBody => write!(f, "Connection closed but no bytes received"),
      Self::Transport(details) => write!(f, "{}", details),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Parse(error) => Some(error),
      Self::Network(error) => Some(error),
      Self::Persistence(_, error) => Some(error),
      Self::RetriesExhausted { error, .. } => Some(error.as_ref()),
      _ => None,
    }
  }
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::Parse(error) => write!(f, "Parse error: {}", error),
      Self::Network(error) => write!(f, "Download failed: {}", error),
      Self::Integrity { path, expected, actual } => write!(f, "Hash mismatch for {}: expected {}, got {}", path, expected, actual),
      Self::Persistence(path, error) => write!(f, "Local file operation on {} failed: {}", path.display(), error),
      Self::RetriesExhausted { error, retries } => write!(f, "{} (giving up after {} retries)", error, retries),
      Self::InvalidConfiguration(details) => write!(f, "Invalid configuration: {}", details),
      Self::Cancelled => write!(f, "Update cancelled"),
    }
  }
}

impl Error {
  /// Network and integrity failures may succeed on another attempt, everything else is final
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Network(_) | Self::Integrity { .. })
  }
}

impl From<ParseError> for Error {
  fn from(error: ParseError) -> Self {
    Self::Parse(error)
  }
}

impl From<NetworkError> for Error {
  fn from(error: NetworkError) -> Self {
    Self::Network(error)
  }
}

impl From<std::string::FromUtf8Error> for ParseError {
  #[track_caller]
  #[inline(always)]
  fn from(error: std::string::FromUtf8Error) -> Self {
    log_error(&error);
    Self::NotUtf8(error.to_string())
  }
}

impl From<download_async::Error> for NetworkError {
  #[track_caller]
  #[inline(always)]
  fn from(error: download_async::Error) -> Self {
    log_error(&error);
    Self::Transport(error.to_string())
  }
}

impl From<download_async::http::uri::InvalidUri> for NetworkError {
  #[track_caller]
  #[inline(always)]
  fn from(error: download_async::http::uri::InvalidUri) -> Self {
    log_error(&error);
    Self::Transport(error.to_string())
  }
}

impl From<url::ParseError> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: url::ParseError) -> Self {
    log_error(&error);
    Self::InvalidConfiguration(error.to_string())
  }
}

#[track_caller]
fn log_error(error: &(impl std::error::Error + ?Sized)) {
  tracing::error!("{:?}", error);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn duplicate_file_message_quotes_path_and_tag() {
    let error = ParseError::DuplicateFile { line: 7, path: "data/a.bin".to_string(), tag: "client".to_string() };
    assert_eq!(error.to_string(), "Duplicate file 'data/a.bin' found for tag 'client' on line 7");
  }

  #[test]
  fn exhausted_retries_keep_the_last_error() {
    let error = Error::RetriesExhausted { error: Box::new(NetworkError::HttpStatus(503, "Service Unavailable".to_string()).into()), retries: 2 };
    assert_eq!(error.to_string(), "Download failed: Server returned status code 503 Service Unavailable (giving up after 2 retries)");
    assert!(std::error::Error::source(&error).is_some());
  }

  #[test]
  fn only_network_and_integrity_failures_are_retried() {
    assert!(Error::from(NetworkError::EmptyBody).is_retryable());
    assert!(Error::Integrity { path: "a".to_string(), expected: "01".to_string(), actual: "02".to_string() }.is_retryable());
    assert!(!Error::from(ParseError::UnreferencedTag("client".to_string())).is_retryable());
    assert!(!Error::Cancelled.is_retryable());
  }
}
