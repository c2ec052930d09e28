use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use futures::channel::mpsc::UnboundedSender;

use crate::structures::UpdateEvent;

pub type Subscriber = Arc<dyn Fn(&UpdateEvent) + Send + Sync>;

/// Counters describing how far along the current run is.
#[derive(Debug, Clone, Default)]
pub struct Progress {
  pub(crate) current_action: Arc<Mutex<String>>,
  /// Files committed .. out of .. files in the delta
  pub(crate) files: Arc<(AtomicU64, AtomicU64)>,
  pub(crate) downloaded_bytes: Arc<AtomicU64>,
}

/// Fan-out of update events to the subscribers, the progress counters and the log.
#[derive(Clone, Default)]
pub struct Events {
  pub(crate) subscribers: Vec<Subscriber>,
  pub(crate) progress: Progress,
  /// Sender of the receiver handed out by `Updater::events`, shared by every clone
  pub(crate) sender: Arc<Mutex<Option<UnboundedSender<UpdateEvent>>>>,
}

/// Counts the bytes of a single request and reports each chunk as it arrives
#[derive(Clone)]
pub struct ByteCounter {
  pub(crate) events: Events,
  pub(crate) url: Arc<String>,
  pub(crate) total: Arc<AtomicU64>,
}
