//! Tracked-file lifecycle: the in-memory collection and its durable copy.

pub mod persistence;
pub mod store;

pub use persistence::{
    restore_after_reload, Persistence, RestoredState, FILES_KEY, RELOAD_INTERRUPTED_MESSAGE,
    ROADMAP_KEY,
};
pub use store::{FileStore, StatusUpdate};
