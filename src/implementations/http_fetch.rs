use async_trait::async_trait;
use download_async::http::HeaderValue;
use tracing::{debug, instrument};

use crate::structures::{ByteCounter, HttpFetch, NetworkError, Response};
use crate::traits::Fetch;

impl HttpFetch {
  pub fn new() -> Self {
    Self {
      user_agent: format!("Hashlist-Patcher ({})", env!("CARGO_PKG_VERSION")),
    }
  }

  pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
    Self {
      user_agent: user_agent.into(),
    }
  }
}

impl Default for HttpFetch {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Fetch for HttpFetch {
  #[instrument(skip(self, url, counter), fields(url = %url))]
  async fn fetch(&self, url: &url::Url, counter: ByteCounter) -> Result<Response, NetworkError> {
    let uri = url.as_str().parse::<download_async::http::Uri>()?;
    let mut downloader = download_async::Downloader::new();
    downloader.use_uri(uri);
    if url.scheme() == "http" {
      downloader.allow_http();
    }
    downloader.use_progress(counter);

    let user_agent = HeaderValue::from_str(&self.user_agent).map_err(|error| NetworkError::Transport(error.to_string()))?;
    let headers = downloader.headers().ok_or_else(|| NetworkError::Transport("Request headers are unavailable".to_string()))?;
    headers.append("User-Agent", user_agent);

    let mut buffer = vec![];
    let parts = downloader.download(download_async::Body::empty(), &mut buffer).await?;
    debug!("{} answered with {}", url, parts.status);

    let headers = parts.headers.iter()
      .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or("<binary>").to_string()))
      .collect();
    let reason = parts.status.canonical_reason().unwrap_or_default().to_string();
    Ok(Response::new(parts.status.as_u16(), reason, headers, buffer))
  }
}
