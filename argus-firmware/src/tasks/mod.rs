//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod frame_sync;
pub mod panel_status;

pub use frame_sync::frame_sync_task;
pub use panel_status::panel_status_task;
