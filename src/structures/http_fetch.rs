/// Fetches resources over HTTP(S) using `download_async`.
#[derive(Debug, Clone)]
pub struct HttpFetch {
  pub(crate) user_agent: String,
}
