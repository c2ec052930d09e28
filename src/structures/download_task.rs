use std::path::PathBuf;

use crate::structures::RetryBudget;

/// Transient unit of work for a single file in the delta.
#[derive(Debug)]
pub struct DownloadTask {
  pub url: url::Url,
  /// Relative path as declared remotely
  pub path: String,
  pub destination: PathBuf,
  /// Location the payload is written to before it is verified and renamed
  pub temporary: PathBuf,
  pub expected_hash: Option<String>,
  pub bytes_read: u64,
  pub retries: RetryBudget,
}
