/// Phase of the update pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
  Idle,
  CheckingVersion,
  UpToDate,
  UpdateRequired,
  /// `recheck` is set while every declared file is being re-verified
  Downloading { recheck: bool },
  Patching { recheck: bool },
  Finished,
  Failed,
}

/// A structured status notification, rendered for humans by its `Display` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
  StartingUpdate,
  StateChanged(UpdateState),
  VersionChecked { up_to_date: bool },
  StartingDownload { path: String },
  HeadersBegin,
  Header { name: String, value: String },
  HeadersEnd,
  /// `bytes` read in the latest chunk, `total` read so far for this request
  BytesRead { url: String, bytes: u64, total: u64 },
  DownloadTimeout { will_retry: bool },
  DownloadFailed { url: String, error: String },
  IntegrityMismatch { path: String, expected: String, actual: String },
  RetriesLeft(u32),
  DownloadFinished { url: String, bytes: u64 },
  FileCommitted { path: String },
  FileRemoved { path: String },
  UpdateFinished,
  Failed(String),
}

/// Terminal, non-error result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
  UpToDate,
  /// Only returned by a check, which never downloads
  UpdateRequired,
  Finished { files: usize, bytes: u64 },
}
