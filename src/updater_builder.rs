use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cancellable::CancelHandle;
use crate::downloader::{Downloader, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use crate::structures::progress::Subscriber;
use crate::structures::{Error, Events, FileStore, HttpFetch, UpdateEvent, UpdateState};
use crate::traits::{Fetch, HashListStore};
use crate::updater::Updater;

pub const DEFAULT_MANIFEST_NAME: &str = "VersionData.txt";
pub const DEFAULT_RETRIES: u32 = 3;

pub struct UpdaterBuilder {
  pub(crate) base_url: String,
  pub(crate) install_dir: PathBuf,
  pub(crate) manifest_name: String,
  pub(crate) timeout: Duration,
  pub(crate) retries: u32,
  pub(crate) retry_delay: Duration,
  pub(crate) tags: Vec<String>,
  pub(crate) prune: bool,
  pub(crate) store: Option<Box<dyn HashListStore>>,
  pub(crate) fetcher: Option<Arc<dyn Fetch>>,
  pub(crate) events: Events,
}

impl UpdaterBuilder {
  pub fn new() -> Self {
    Self {
      base_url: "".to_string(),
      install_dir: PathBuf::new(),
      manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
      timeout: DEFAULT_TIMEOUT,
      retries: DEFAULT_RETRIES,
      retry_delay: DEFAULT_RETRY_DELAY,
      tags: Vec::new(),
      prune: false,
      store: None,
      fetcher: None,
      events: Events::new(),
    }
  }

  /// Location of the manifest, `hashlist.ver`, `hashlist.dat` and the files themselves
  pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
    self.base_url = base_url.into();
    self
  }

  pub fn set_install_dir(&mut self, install_dir: impl Into<PathBuf>) -> &mut Self {
    self.install_dir = install_dir.into();
    self
  }

  pub fn set_manifest_name(&mut self, manifest_name: impl Into<String>) -> &mut Self {
    self.manifest_name = manifest_name.into();
    self
  }

  /// Upper bound for a single request
  pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
    self.timeout = timeout;
    self
  }

  /// Attempts allowed per request, the first one included
  pub fn set_retries(&mut self, retries: u32) -> &mut Self {
    self.retries = retries;
    self
  }

  pub fn set_retry_delay(&mut self, retry_delay: Duration) -> &mut Self {
    self.retry_delay = retry_delay;
    self
  }

  /// Restricts updates to the given tag. Without any, every declared tag is updated.
  pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
    self.tags.push(tag.into());
    self
  }

  /// Whether tracked files that are no longer distributed get deleted
  pub fn set_prune(&mut self, prune: bool) -> &mut Self {
    self.prune = prune;
    self
  }

  pub fn set_store(&mut self, store: Box<dyn HashListStore>) -> &mut Self {
    self.store = Some(store);
    self
  }

  pub fn set_fetcher(&mut self, fetcher: Arc<dyn Fetch>) -> &mut Self {
    self.fetcher = Some(fetcher);
    self
  }

  pub fn subscribe(&mut self, subscriber: impl Fn(&UpdateEvent) + Send + Sync + 'static) -> &mut Self {
    let subscriber: Subscriber = Arc::new(subscriber);
    self.events.subscribe(subscriber);
    self
  }

  pub fn build(self) -> Result<Updater, Error> {
    let base_url = url::Url::parse(&self.base_url)?;
    if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
      return Err(Error::InvalidConfiguration(format!("Base url must be an http(s) url: {}", self.base_url)));
    }
    if self.install_dir.as_os_str().is_empty() {
      return Err(Error::InvalidConfiguration("No installation directory set".to_string()));
    }
    if self.manifest_name.is_empty() || self.manifest_name.contains(|c: char| c == '/' || c == '\\') {
      return Err(Error::InvalidConfiguration(format!("Invalid manifest name: '{}'", self.manifest_name)));
    }
    if self.timeout.is_zero() {
      return Err(Error::InvalidConfiguration("Timeout must be longer than zero".to_string()));
    }
    if self.retries == 0 {
      return Err(Error::InvalidConfiguration("At least one attempt per request is required".to_string()));
    }

    let events = self.events;
    let fetcher: Arc<dyn Fetch> = match self.fetcher {
      Some(fetcher) => fetcher,
      None => Arc::new(HttpFetch::new()),
    };
    let downloader = Downloader::new(fetcher, events.clone())
      .with_timeout(self.timeout)
      .with_retry_delay(self.retry_delay);
    let install_dir = self.install_dir;
    let store: Box<dyn HashListStore> = match self.store {
      Some(store) => store,
      None => Box::new(FileStore::new(install_dir.clone())),
    };

    Ok(Updater {
      base_url,
      install_dir,
      manifest_name: self.manifest_name,
      retries: self.retries,
      tags: self.tags,
      prune: self.prune,
      downloader,
      store,
      events,
      state: UpdateState::Idle,
      cancel_handle: CancelHandle::new(),
    })
  }
}

impl Default for UpdaterBuilder {
  fn default() -> Self {
    Self::new()
  }
}
