mod get_hash;
mod human_readable_bytesize;
mod normalize_path;
mod remove_unversioned;

pub(crate) use get_hash::get_hash as get_hash;
pub use get_hash::hash_bytes as hash_bytes;
pub use human_readable_bytesize::human_readable_bytesize as human_readable_bytesize;
pub(crate) use normalize_path::normalize_path as normalize_path;
pub(crate) use remove_unversioned::remove_unversioned as remove_unversioned;
