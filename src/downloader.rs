use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use crate::structures::{ByteCounter, Events, NetworkError, Payload, Response, RetryBudget, UpdateEvent};
use crate::traits::Fetch;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// The only component that talks to the network.
///
/// Every attempt is bounded by `timeout`; an attempt that times out is repeated as long as the retry
/// budget allows. Any other failure is returned to the caller right away.
#[derive(Clone)]
pub struct Downloader {
  fetcher: Arc<dyn Fetch>,
  timeout: Duration,
  retry_delay: Duration,
  events: Events,
}

impl Downloader {
  pub fn new(fetcher: Arc<dyn Fetch>, events: Events) -> Self {
    Self {
      fetcher,
      timeout: DEFAULT_TIMEOUT,
      retry_delay: DEFAULT_RETRY_DELAY,
      events,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
    self.retry_delay = retry_delay;
    self
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  pub fn retry_delay(&self) -> Duration {
    self.retry_delay
  }

  #[instrument(skip(self, url, budget), fields(url = %url))]
  pub async fn fetch(&self, url: &url::Url, budget: &mut RetryBudget) -> Result<Payload, NetworkError> {
    let result = self.fetch_with_timeouts(url, budget).await.and_then(|response| self.accept(url, response));
    if let Err(error) = &result {
      self.events.emit(UpdateEvent::DownloadFailed { url: url.to_string(), error: error.to_string() });
    }
    result
  }

  async fn fetch_with_timeouts(&self, url: &url::Url, budget: &mut RetryBudget) -> Result<Response, NetworkError> {
    loop {
      let counter = ByteCounter::new(self.events.clone(), url.as_str());
      match tokio::time::timeout(self.timeout, self.fetcher.fetch(url, counter)).await {
        Ok(response) => return response,
        Err(_) => {
          let retries_left = budget.consume();
          self.events.emit(UpdateEvent::DownloadTimeout { will_retry: retries_left.is_some() });
          match retries_left {
            Some(retries_left) => {
              self.events.emit(UpdateEvent::RetriesLeft(retries_left));
              tokio::time::sleep(self.retry_delay).await;
            },
            None => return Err(NetworkError::Timeout),
          }
        },
      }
    }
  }

  fn accept(&self, url: &url::Url, response: Response) -> Result<Payload, NetworkError> {
    self.events.emit(UpdateEvent::HeadersBegin);
    for (name, value) in &response.headers {
      self.events.emit(UpdateEvent::Header { name: name.clone(), value: value.clone() });
    }
    self.events.emit(UpdateEvent::HeadersEnd);

    if !response.is_success() {
      warn!("{} returned {} {}", url, response.status, response.reason);
      return Err(NetworkError::HttpStatus(response.status, response.reason));
    }
    if response.body.is_empty() {
      return Err(NetworkError::EmptyBody);
    }
    let bytes = response.body.len() as u64;
    self.events.emit(UpdateEvent::DownloadFinished { url: url.to_string(), bytes });
    Ok(Payload {
      body: response.body,
      bytes,
    })
  }
}

impl std::fmt::Debug for Downloader {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.debug_struct("Downloader")
      .field("timeout", &self.timeout)
      .field("retry_delay", &self.retry_delay)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::tests::{Reply, ScriptedFetch};

  const URL: &str = "http://patch.example.org/hashlist.ver";

  fn recorder() -> (Events, Arc<Mutex<Vec<UpdateEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut events = Events::new();
    let sink = seen.clone();
    events.subscribe(Arc::new(move |event: &UpdateEvent| sink.lock().unwrap().push(event.clone())));
    (events, seen)
  }

  fn downloader(fetch: ScriptedFetch, events: Events) -> Downloader {
    Downloader::new(Arc::new(fetch), events).with_timeout(Duration::from_secs(5))
  }

  fn retries_left(seen: &[UpdateEvent]) -> Vec<u32> {
    seen.iter().filter_map(|event| match event { UpdateEvent::RetriesLeft(left) => Some(*left), _ => None }).collect()
  }

  #[tokio::test(start_paused = true)]
  async fn succeeds_after_n_minus_one_timeouts() {
    let fetch = ScriptedFetch::new().route(URL, vec![Reply::Hang, Reply::Hang, Reply::body("3")]);
    let (events, seen) = recorder();
    let downloader = downloader(fetch.clone(), events);

    let mut budget = RetryBudget::new(3);
    let payload = downloader.fetch(&URL.parse().unwrap(), &mut budget).await.unwrap();

    assert_eq!(payload.body, b"3");
    assert_eq!(payload.bytes, 1);
    assert_eq!(fetch.requests(URL), 3);
    assert_eq!(retries_left(&seen.lock().unwrap()), vec![2, 1]);
  }

  #[tokio::test(start_paused = true)]
  async fn gives_up_with_timeout_after_exactly_n_attempts() {
    let fetch = ScriptedFetch::new().route(URL, vec![Reply::Hang]);
    let (events, seen) = recorder();
    let downloader = downloader(fetch.clone(), events);

    let started = tokio::time::Instant::now();
    let mut budget = RetryBudget::new(4);
    let result = downloader.fetch(&URL.parse().unwrap(), &mut budget).await;

    assert_eq!(result, Err(NetworkError::Timeout));
    assert_eq!(fetch.requests(URL), 4);
    assert_eq!(budget.remaining(), 0);
    assert_eq!(started.elapsed(), Duration::from_secs(4 * 5 + 3));
    let seen = seen.lock().unwrap();
    assert_eq!(retries_left(&seen), vec![3, 2, 1]);
    assert_eq!(seen.iter().filter(|event| matches!(event, UpdateEvent::DownloadTimeout { will_retry: false })).count(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn error_status_is_returned_without_retrying() {
    let fetch = ScriptedFetch::new().route(URL, vec![Reply::Status(404, "Not Found".to_string()), Reply::body("3")]);
    let downloader = downloader(fetch.clone(), Events::new());

    let mut budget = RetryBudget::new(3);
    let result = downloader.fetch(&URL.parse().unwrap(), &mut budget).await;

    assert_eq!(result, Err(NetworkError::HttpStatus(404, "Not Found".to_string())));
    assert_eq!(fetch.requests(URL), 1);
    assert_eq!(budget.remaining(), 3);
  }

  #[tokio::test(start_paused = true)]
  async fn empty_body_is_an_error() {
    let fetch = ScriptedFetch::new().route(URL, vec![Reply::body("")]);
    let downloader = downloader(fetch, Events::new());
    let result = downloader.fetch(&URL.parse().unwrap(), &mut RetryBudget::new(1)).await;
    assert_eq!(result, Err(NetworkError::EmptyBody));
  }

  #[tokio::test(start_paused = true)]
  async fn reports_headers_and_bytes() {
    let fetch = ScriptedFetch::new().route(URL, vec![Reply::body("12345")]);
    let (events, seen) = recorder();
    let downloader = downloader(fetch, events);
    downloader.fetch(&URL.parse().unwrap(), &mut RetryBudget::new(1)).await.unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.contains(&UpdateEvent::HeadersBegin));
    assert!(seen.contains(&UpdateEvent::Header { name: "content-length".to_string(), value: "5".to_string() }));
    assert!(seen.contains(&UpdateEvent::HeadersEnd));
    assert!(seen.contains(&UpdateEvent::BytesRead { url: URL.to_string(), bytes: 5, total: 5 }));
    assert_eq!(seen.last(), Some(&UpdateEvent::DownloadFinished { url: URL.to_string(), bytes: 5 }));
  }
}
