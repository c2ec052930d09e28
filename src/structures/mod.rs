pub mod error;
pub use error::{Error, NetworkError, ParseError};

pub mod version;
pub use version::Version;

pub mod file_entry;
pub use file_entry::FileEntry;

pub mod manifest;
pub use manifest::Manifest;

pub mod hash_list;
pub use hash_list::{HashEntry, HashList};

pub mod recorded_stamp;
pub use recorded_stamp::RecordedStamp;

pub mod delta_entry;
pub use delta_entry::DeltaEntry;

pub mod download_task;
pub use download_task::DownloadTask;

pub mod retry_budget;
pub use retry_budget::RetryBudget;

pub mod response;
pub use response::{Payload, Response};

pub mod update_event;
pub use update_event::{UpdateEvent, UpdateOutcome, UpdateState};

pub mod progress;
pub use progress::{ByteCounter, Events, Progress};

pub mod file_store;
pub use file_store::FileStore;

pub mod memory_store;
pub use memory_store::MemoryStore;

pub mod http_fetch;
pub use http_fetch::HttpFetch;
