mod error;
pub(crate) mod file_store;
pub(crate) mod hash_list;
mod http_fetch;
mod manifest;
mod memory_store;
mod progress;
mod recorded_stamp;
mod response;
mod retry_budget;
mod update_event;
