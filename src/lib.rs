//! Keeps an installation directory in sync with a remote distribution.
//!
//! The server publishes a version descriptor (`VersionData.txt`) listing the available tags and the
//! files belonging to each of them, a hash list of files common to every tag (`hashlist.dat`) and a
//! version stamp (`hashlist.ver`). Only files whose hash differs from the locally recorded one are
//! downloaded, verified and moved into place.

//Modules
mod cancellable;
mod downloader;
mod functions;
mod hash_catalog;
mod implementations;
pub mod structures;
pub mod traits;
mod updater;
mod updater_builder;


pub use crate::cancellable::CancelHandle;
pub use crate::downloader::Downloader;
pub use crate::functions::{hash_bytes, human_readable_bytesize};
pub use crate::hash_catalog::{CheckMode, HashCatalog};
pub use crate::structures::{
  DeltaEntry, Error, FileEntry, FileStore, HashList, HttpFetch, Manifest, MemoryStore, NetworkError, ParseError, Progress,
  UpdateEvent, UpdateOutcome, UpdateState, Version,
};
pub use crate::updater::Updater;
pub use crate::updater_builder::{UpdaterBuilder, DEFAULT_MANIFEST_NAME, DEFAULT_RETRIES};
