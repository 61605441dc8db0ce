//! Liveness probe implementations
//!
//! Two flavors, selected per panel by `argus_core::config::ProbeKind`:
//! the bus-turnaround acknowledge for panels that implement BTA
//! correctly, and a power-mode register compare for panels that ack
//! unconditionally but scramble their state when they wedge.

pub mod bta;
pub mod reg;

pub use bta::BtaProbe;
pub use reg::PowerModeProbe;
