use async_trait::async_trait;

use crate::structures::{ByteCounter, NetworkError, Response};

/// A transport able to perform a single GET request.
///
/// Implementations report every chunk of the body to `counter` as it is read and must not retry on
/// their own; timeouts and retries are handled by the `Downloader` wrapping them.
#[async_trait]
pub trait Fetch: Send + Sync {
  async fn fetch(&self, url: &url::Url, counter: ByteCounter) -> Result<Response, NetworkError>;
}
