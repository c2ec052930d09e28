use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, trace, warn};

use crate::structures::{ByteCounter, Events, Progress, UpdateEvent, UpdateState};
use crate::structures::progress::Subscriber;

impl Progress {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get_current_action(&self) -> String {
    self.current_action.lock().map(|action| action.clone()).unwrap_or_default()
  }

  pub(crate) fn set_current_action(&self, value: String) {
    if let Ok(mut action) = self.current_action.lock() {
      *action = value;
    }
  }

  /// Files committed and the total amount of files in the delta
  pub fn files(&self) -> (u64, u64) {
    (self.files.0.load(Ordering::Relaxed), self.files.1.load(Ordering::Relaxed))
  }

  pub fn downloaded_bytes(&self) -> u64 {
    self.downloaded_bytes.load(Ordering::Relaxed)
  }

  pub(crate) fn set_files_amount(&self, value: u64) {
    info!("Amount of files to update: {}", value);
    self.files.0.store(0, Ordering::Relaxed);
    self.files.1.store(value, Ordering::Relaxed);
  }

  pub(crate) fn increment_files(&self) {
    self.files.0.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn add_downloaded_bytes(&self, value: u64) {
    self.downloaded_bytes.fetch_add(value, Ordering::Relaxed);
  }
}

impl Events {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&mut self, subscriber: Subscriber) {
    self.subscribers.push(subscriber);
  }

  pub fn progress(&self) -> &Progress {
    &self.progress
  }

  /// Starts forwarding events to a new receiver. A receiver opened earlier stops receiving.
  pub fn channel(&self) -> UnboundedReceiver<UpdateEvent> {
    let (sender, receiver) = futures::channel::mpsc::unbounded();
    if let Ok(mut channel) = self.sender.lock() {
      *channel = Some(sender);
    }
    receiver
  }

  fn forward(&self, event: &UpdateEvent) {
    if let Ok(mut channel) = self.sender.lock() {
      let closed = channel.as_ref().map_or(false, |sender| sender.unbounded_send(event.clone()).is_err());
      if closed {
        *channel = None;
      }
    }
  }

  /// Logs the event, folds it into the progress counters and hands it to every subscriber
  pub fn emit(&self, event: UpdateEvent) {
    match &event {
      UpdateEvent::Failed(_) => error!("{}", event),
      event if event.is_warning() => warn!("{}", event),
      UpdateEvent::BytesRead { .. } => trace!("{}", event),
      event if event.is_diagnostic() => debug!("{}", event),
      _ => info!("{}", event),
    }
    match &event {
      UpdateEvent::StateChanged(state) => self.progress.set_current_action(state.to_string()),
      UpdateEvent::StartingDownload { .. } => self.progress.set_current_action(event.to_string()),
      UpdateEvent::BytesRead { bytes, .. } => self.progress.add_downloaded_bytes(*bytes),
      UpdateEvent::FileCommitted { .. } => self.progress.increment_files(),
      _ => {},
    }
    for subscriber in &self.subscribers {
      subscriber(&event);
    }
    self.forward(&event);
  }

  pub(crate) fn state(&self, state: UpdateState) {
    self.emit(UpdateEvent::StateChanged(state));
  }
}

impl std::fmt::Debug for Events {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.debug_struct("Events")
      .field("subscribers", &self.subscribers.len())
      .field("channel", &self.sender.lock().map(|channel| channel.is_some()).unwrap_or_default())
      .field("progress", &self.progress)
      .finish()
  }
}

impl ByteCounter {
  pub fn new(events: Events, url: &str) -> Self {
    Self {
      events,
      url: Arc::new(url.to_string()),
      total: Arc::new(AtomicU64::new(0)),
    }
  }

  /// Records a chunk of `amount` bytes
  pub fn add(&self, amount: u64) {
    let total = self.total.fetch_add(amount, Ordering::Relaxed) + amount;
    self.events.emit(UpdateEvent::BytesRead { url: self.url.to_string(), bytes: amount, total });
  }

  /// Forgets bytes that were counted for a body that is being discarded
  pub fn remove(&self, amount: u64) {
    let _ = self.total.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| Some(total.saturating_sub(amount)));
  }

  pub fn total(&self) -> u64 {
    self.total.load(Ordering::Relaxed)
  }
}

impl std::fmt::Debug for ByteCounter {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.debug_struct("ByteCounter").field("url", &self.url).field("total", &self.total()).finish()
  }
}

#[async_trait]
impl download_async::Progress for ByteCounter {
  async fn set_file_size(&mut self, _size: usize) {
  }

  async fn add_to_progress(&mut self, amount: usize) {
    self.add(amount as u64);
  }

  async fn remove_from_progress(&mut self, amount: usize) {
    self.remove(amount as u64);
  }
}
