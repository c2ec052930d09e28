mod fetch;
mod hash_list_store;
mod persistence_context;

pub use fetch::Fetch;
pub use hash_list_store::HashListStore;
pub(crate) use persistence_context::PersistenceContext;
