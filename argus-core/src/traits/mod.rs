//! Hardware abstraction traits
//!
//! These traits define the interface between the watchdog logic and
//! hardware-specific implementations.

pub mod status;

pub use status::{ClockGate, FailureReporter, ProbeError, StatusProbe};
