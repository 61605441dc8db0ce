//! Panel liveness state and the per-tick decision pipeline

pub mod health;
pub mod monitor;

pub use health::{DeadState, DeadTransition, PanelHealth};
pub use monitor::{LockPlan, LockedCheck, Precheck, TickContext, TickOutcome};
