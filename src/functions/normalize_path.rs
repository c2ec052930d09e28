use crate::structures::ParseError;

/// Turns a declared path into the `/` separated relative form used as hash list key.
/// Rejects anything that could resolve outside the installation directory.
pub(crate) fn normalize_path(line: usize, raw: &str) -> Result<String, ParseError> {
  let path = raw.replace('\\', "/");
  let unsafe_path = path.starts_with('/')
    || path.as_bytes().get(1) == Some(&b':')
    || path.split('/').any(|component| component.is_empty() || component == "." || component == "..");
  if unsafe_path {
    return Err(ParseError::UnsafePath(line, raw.to_string()));
  }
  Ok(path)
}
