use crate::functions::human_readable_bytesize;
use crate::structures::{UpdateEvent, UpdateState};

impl std::fmt::Display for UpdateState {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::Idle => write!(f, "Idle"),
      Self::CheckingVersion => write!(f, "Checking version"),
      Self::UpToDate => write!(f, "Up-to-date"),
      Self::UpdateRequired => write!(f, "Update required"),
      Self::Downloading { recheck: false } => write!(f, "Downloading"),
      Self::Downloading { recheck: true } => write!(f, "Rechecking all files: downloading"),
      Self::Patching { recheck: false } => write!(f, "Patching"),
      Self::Patching { recheck: true } => write!(f, "Rechecking all files: patching"),
      Self::Finished => write!(f, "Finished"),
      Self::Failed => write!(f, "Failed"),
    }
  }
}

impl std::fmt::Display for UpdateEvent {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::StartingUpdate => write!(f, "Starting update"),
      Self::StateChanged(state) => write!(f, "{}", state),
      Self::VersionChecked { up_to_date: true } => write!(f, "Checking version: up-to-date"),
      Self::VersionChecked { up_to_date: false } => write!(f, "Checking version: update required"),
      Self::StartingDownload { path } => write!(f, "Starting download of {}", path),
      Self::HeadersBegin => write!(f, "-- BEGIN HEADER --"),
      Self::Header { name, value } => write!(f, "Header: {}: {}", name, value),
      Self::HeadersEnd => write!(f, "-- END HEADER --"),
      Self::BytesRead { bytes, .. } => write!(f, "Read {} bytes of data", bytes),
      Self::DownloadTimeout { will_retry: true } => write!(f, "Download timeout: will retry download"),
      Self::DownloadTimeout { will_retry: false } => write!(f, "Download timeout: giving up"),
      Self::DownloadFailed { error, .. } => write!(f, "Download failed: {}", error),
      Self::IntegrityMismatch { path, expected, actual } => write!(f, "Failed to patch {}: expected hash {}, got {}", path, expected, actual),
      Self::RetriesLeft(retries) => write!(f, "There is {} retries left before giving up", retries),
      Self::DownloadFinished { bytes, .. } => write!(f, "Download finished ({})", human_readable_bytesize(*bytes)),
      Self::FileCommitted { path } => write!(f, "Updated {}", path),
      Self::FileRemoved { path } => write!(f, "Removed {}", path),
      Self::UpdateFinished => write!(f, "Update finished"),
      Self::Failed(message) => write!(f, "Update failed: {}", message),
    }
  }
}

impl UpdateEvent {
  /// Events that point at a problem, even when it is recovered from
  pub fn is_warning(&self) -> bool {
    matches!(self, Self::DownloadTimeout { .. } | Self::DownloadFailed { .. } | Self::IntegrityMismatch { .. } | Self::RetriesLeft(_))
  }

  /// Chatty diagnostics a front end usually does not show
  pub fn is_diagnostic(&self) -> bool {
    matches!(self, Self::HeadersBegin | Self::Header { .. } | Self::HeadersEnd | Self::BytesRead { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_status_text() {
    assert_eq!(UpdateEvent::StartingUpdate.to_string(), "Starting update");
    assert_eq!(UpdateEvent::VersionChecked { up_to_date: true }.to_string(), "Checking version: up-to-date");
    assert_eq!(UpdateEvent::VersionChecked { up_to_date: false }.to_string(), "Checking version: update required");
    assert_eq!(UpdateEvent::RetriesLeft(2).to_string(), "There is 2 retries left before giving up");
    assert_eq!(UpdateEvent::StartingDownload { path: "a.bin".to_string() }.to_string(), "Starting download of a.bin");
    assert_eq!(UpdateEvent::DownloadFinished { url: String::new(), bytes: 2_500 }.to_string(), "Download finished (2.50 kB)");
  }

  #[test]
  fn classifies_events() {
    assert!(UpdateEvent::RetriesLeft(1).is_warning());
    assert!(UpdateEvent::HeadersEnd.is_diagnostic());
    assert!(!UpdateEvent::UpdateFinished.is_warning());
  }
}
