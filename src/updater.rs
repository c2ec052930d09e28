use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use futures::channel::mpsc::UnboundedReceiver;
use tracing::{info, instrument};

use crate::cancellable::{CancelHandle, CancellableTrait};
use crate::downloader::Downloader;
use crate::functions::{get_hash, remove_unversioned};
use crate::hash_catalog::{CheckMode, HashCatalog};
use crate::implementations::file_store::{HASH_LIST_FILE, STAMP_FILE};
use crate::implementations::hash_list::hashes_match;
use crate::structures::{DeltaEntry, DownloadTask, Error, Events, HashList, Manifest, Progress, RecordedStamp, RetryBudget, UpdateEvent, UpdateOutcome, UpdateState};
use crate::traits::{HashListStore, PersistenceContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Check,
  Update,
  RecheckAll,
}

/// Brings an installation directory in line with the remote distribution.
///
/// Built through `UpdaterBuilder`. A run goes through CheckingVersion, then either stops at UpToDate
/// or continues with Downloading and Patching for every file in the delta, and ends in Finished or
/// Failed. Running again after a failure starts over from CheckingVersion.
pub struct Updater {
  pub(crate) base_url: url::Url,
  pub(crate) install_dir: PathBuf,
  pub(crate) manifest_name: String,
  pub(crate) retries: u32,
  pub(crate) tags: Vec<String>,
  pub(crate) prune: bool,
  pub(crate) downloader: Downloader,
  pub(crate) store: Box<dyn HashListStore>,
  pub(crate) events: Events,
  pub(crate) state: UpdateState,
  pub(crate) cancel_handle: CancelHandle,
}

impl Updater {
  /// Checks for and applies an update
  pub async fn run(&mut self) -> Result<UpdateOutcome, Error> {
    self.execute(Mode::Update).await
  }

  /// Only compares the version stamps, never downloads anything
  pub async fn check(&mut self) -> Result<UpdateOutcome, Error> {
    self.execute(Mode::Check).await
  }

  /// Hashes every declared file on disk, regardless of the version stamps, and repairs what differs
  pub async fn recheck_all(&mut self) -> Result<UpdateOutcome, Error> {
    self.execute(Mode::RecheckAll).await
  }

  pub fn state(&self) -> UpdateState {
    self.state
  }

  pub fn progress(&self) -> &Progress {
    self.events.progress()
  }

  pub fn install_dir(&self) -> &Path {
    &self.install_dir
  }

  pub fn cancel_handle(&self) -> CancelHandle {
    self.cancel_handle.clone()
  }

  /// Receiver of every event this updater emits from now on. Nothing is queued before the first call,
  /// and calling it again detaches the previous receiver.
  pub fn events(&self) -> UnboundedReceiver<UpdateEvent> {
    self.events.channel()
  }

  async fn execute(&mut self, mode: Mode) -> Result<UpdateOutcome, Error> {
    let cancel_handle = self.cancel_handle.clone();
    let result = self.pipeline(mode).cancellable(cancel_handle.clone()).await;
    if let Err(error) = &result {
      if let Error::Cancelled = error {
        cancel_handle.reset();
      }
      self.set_state(UpdateState::Failed);
      self.events.emit(UpdateEvent::Failed(error.to_string()));
    }
    result
  }

  #[instrument(skip(self), fields(base_url = %self.base_url))]
  async fn pipeline(&mut self, mode: Mode) -> Result<UpdateOutcome, Error> {
    if mode != Mode::Check {
      self.events.emit(UpdateEvent::StartingUpdate);
    }
    self.set_state(UpdateState::CheckingVersion);

    let manifest_text = self.fetch_text(&self.manifest_name).await?;
    let manifest = Manifest::parse(&manifest_text)?;
    self.validate_tags(&manifest)?;

    let local = self.store.load()?;
    let recorded = local.stamp().map(RecordedStamp::parse);
    let remote_stamp = self.fetch_text(STAMP_FILE).await?.trim().to_string();
    let scope = self.scope(&manifest);

    if mode != Mode::RecheckAll {
      let up_to_date = recorded.as_ref().map_or(false, |recorded| recorded.covers(&remote_stamp, scope.as_ref()));
      self.events.emit(UpdateEvent::VersionChecked { up_to_date });
      if up_to_date {
        self.set_state(UpdateState::UpToDate);
        return Ok(UpdateOutcome::UpToDate);
      }
      self.set_state(UpdateState::UpdateRequired);
      if mode == Mode::Check {
        return Ok(UpdateOutcome::UpdateRequired);
      }
    }

    let recheck = mode == Mode::RecheckAll;
    let common = HashList::parse(&self.fetch_text(HASH_LIST_FILE).await?)?;
    let catalog = HashCatalog::new(&common, &manifest, &self.tags);
    let check_mode = if recheck { CheckMode::RecheckAll } else { CheckMode::Incremental };
    let delta = catalog.delta(&self.install_dir, &local, check_mode)?;
    info!("{} of {} files need to be downloaded", delta.len(), catalog.remote().len());
    self.events.progress().set_files_amount(delta.len() as u64);

    let mut bytes = 0;
    for entry in &delta {
      let mut task = self.task(entry)?;
      bytes += self.update_file(&mut task, recheck).await?;
    }
    self.record_verified(&catalog, &local, &delta)?;

    if self.prune {
      remove_unversioned(&self.install_dir, &local, &common, &manifest, &mut *self.store, &self.events)?;
    }

    let stamp = RecordedStamp::after_run(recorded.as_ref(), &remote_stamp, scope.as_ref(), &manifest);
    self.store.commit_stamp(&stamp.to_string())?;
    self.set_state(UpdateState::Finished);
    self.events.emit(UpdateEvent::UpdateFinished);
    Ok(UpdateOutcome::Finished { files: delta.len(), bytes })
  }

  fn set_state(&mut self, state: UpdateState) {
    self.state = state;
    self.events.state(state);
  }

  fn validate_tags(&self, manifest: &Manifest) -> Result<(), Error> {
    match self.tags.iter().find(|tag| manifest.version(tag).is_none()) {
      Some(tag) => Err(Error::InvalidConfiguration(format!("Tag '{}' is not declared by {}", tag, self.manifest_name))),
      None => Ok(()),
    }
  }

  /// Tags this updater is restricted to, `None` when it covers every declared tag
  fn scope(&self, manifest: &Manifest) -> Option<BTreeSet<String>> {
    let scope: BTreeSet<String> = self.tags.iter().cloned().collect();
    if scope.is_empty() || manifest.tags().all(|tag| scope.contains(tag)) {
      None
    } else {
      Some(scope)
    }
  }

  /// Files common to every tag live next to the manifest, tagged files below a directory named after the tag
  fn resource_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<url::Url, Error> {
    let mut url = self.base_url.clone();
    url.path_segments_mut()
      .map_err(|_| Error::InvalidConfiguration(format!("{} cannot be used as base url", self.base_url)))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  fn task(&self, entry: &DeltaEntry) -> Result<DownloadTask, Error> {
    let url = self.resource_url(entry.tag.as_deref().into_iter().chain(entry.path.split('/')))?;
    let destination = self.install_dir.join(&entry.path);
    let mut temporary = destination.as_os_str().to_owned();
    temporary.push(".part");
    Ok(DownloadTask {
      url,
      path: entry.path.clone(),
      destination,
      temporary: PathBuf::from(temporary),
      expected_hash: Some(entry.hash.clone()),
      bytes_read: 0,
      retries: RetryBudget::new(self.retries),
    })
  }

  async fn fetch_text(&self, name: &str) -> Result<String, Error> {
    let url = self.resource_url([name])?;
    let mut budget = RetryBudget::new(self.retries);
    loop {
      match self.downloader.fetch(&url, &mut budget).await {
        Ok(payload) => return Ok(payload.text()?),
        Err(error) => self.retry_or_fail(error.into(), &mut budget).await?,
      }
    }
  }

  #[instrument(skip(self, task), fields(path = %task.path))]
  async fn update_file(&mut self, task: &mut DownloadTask, recheck: bool) -> Result<u64, Error> {
    loop {
      match self.attempt(task, recheck).await {
        Ok(bytes) => return Ok(bytes),
        Err(error) => self.retry_or_fail(error, &mut task.retries).await?,
      }
    }
  }

  /// Downloads into the temporary file, verifies it, moves it into place and commits its hash
  async fn attempt(&mut self, task: &mut DownloadTask, recheck: bool) -> Result<u64, Error> {
    self.set_state(UpdateState::Downloading { recheck });
    self.events.emit(UpdateEvent::StartingDownload { path: task.path.clone() });
    let payload = self.downloader.fetch(&task.url, &mut task.retries).await?;
    task.bytes_read = payload.bytes;

    self.set_state(UpdateState::Patching { recheck });
    write_file(&task.temporary, payload.as_ref())?;
    let actual = get_hash(&task.temporary)?;
    if let Some(expected) = task.expected_hash.as_deref().filter(|expected| !hashes_match(expected, &actual)) {
      let _ = std::fs::remove_file(&task.temporary);
      self.events.emit(UpdateEvent::IntegrityMismatch { path: task.path.clone(), expected: expected.to_string(), actual: actual.clone() });
      return Err(Error::Integrity { path: task.path.clone(), expected: expected.to_string(), actual });
    }
    std::fs::rename(&task.temporary, &task.destination).persistence_context(&task.destination)?;

    let hash = task.expected_hash.clone().unwrap_or(actual);
    self.store.commit_entry(&task.path, &hash)?;
    self.events.emit(UpdateEvent::FileCommitted { path: task.path.clone() });
    Ok(task.bytes_read)
  }

  /// Waits out the retry delay when another attempt is allowed, otherwise escalates the error
  async fn retry_or_fail(&self, error: Error, budget: &mut RetryBudget) -> Result<(), Error> {
    if !error.is_retryable() {
      return Err(error);
    }
    match budget.consume() {
      Some(retries_left) => {
        self.events.emit(UpdateEvent::RetriesLeft(retries_left));
        tokio::time::sleep(self.downloader.retry_delay()).await;
        Ok(())
      },
      None => Err(Error::RetriesExhausted { retries: budget.retries_attempted(), error: Box::new(error) }),
    }
  }

  /// Files found intact on disk are recorded as well, so the local list ends up matching the remote one
  fn record_verified(&mut self, catalog: &HashCatalog, local: &HashList, delta: &[DeltaEntry]) -> Result<(), Error> {
    let downloaded: HashSet<&str> = delta.iter().map(|entry| entry.path.as_str()).collect();
    let verified: Vec<(&str, &str)> = catalog.remote().iter()
      .filter(|entry| !downloaded.contains(entry.path.as_str()) && local.get(&entry.path) != Some(entry.hash.as_str()))
      .map(|entry| (entry.path.as_str(), entry.hash.as_str()))
      .collect();
    if verified.is_empty() {
      return Ok(());
    }
    self.store.commit_entries(&verified)
  }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), Error> {
  if let Some(parent) = path.parent() {
    std::fs::DirBuilder::new().recursive(true).create(parent).persistence_context(parent)?;
  }
  std::fs::write(path, contents).persistence_context(path)
}

impl std::fmt::Debug for Updater {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.debug_struct("Updater")
      .field("base_url", &self.base_url.as_str())
      .field("install_dir", &self.install_dir)
      .field("manifest_name", &self.manifest_name)
      .field("retries", &self.retries)
      .field("tags", &self.tags)
      .field("prune", &self.prune)
      .field("state", &self.state)
      .finish()
  }
}
