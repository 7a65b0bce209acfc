//! The application context.
//!
//! A [`Session`] owns the tracked files, the roadmap and their durable copy.
//! Every mutation is a message to one loop task; analyses and roadmap
//! requests run as separate tasks and report back through the same channel.
//! Callers interact through a cloneable [`SessionHandle`].

pub mod confirm;
pub mod events;
pub mod handle;
pub mod runner;
pub mod upload;

pub use confirm::{AssumeYes, Confirm, CLEAR_CONFIRMATION_QUESTION};
pub use events::{EventBroadcaster, SessionEvent};
pub use handle::SessionHandle;
pub use runner::{
    Session, SessionDeps, SessionSnapshot, MISSING_PAYLOAD_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
pub use upload::screen_uploads;
