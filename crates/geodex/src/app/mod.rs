//! Application layer
//!
//! Commands in, snapshots and events out. Frontends never touch the
//! stores directly.

pub mod controller;
pub mod events;
pub mod state;

pub use controller::AppController;
pub use events::Observers;
pub use state::{AppCommand, AppEvent, AppSnapshot, Notice, NoticeKind};
