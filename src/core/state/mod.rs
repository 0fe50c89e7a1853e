// Durable last-import record and its store

pub mod record;
pub mod store;

pub use record::{SessionRecord, LAST_IMPORT_KEY};
pub use store::SessionStore;
