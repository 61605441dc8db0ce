//! Bus-turnaround liveness probe

use argus_core::traits::{ProbeError, StatusProbe};

use crate::bridge::{BridgeError, DsiHostBridge};

/// Handshake attempts before the panel is declared unresponsive
///
/// One retry absorbs a probe that collides with transient bus noise; a
/// genuinely dead panel fails both.
const ATTEMPTS: u8 = 2;

/// Liveness probe via DSI bus turnaround
///
/// The panel proves it is alive by taking over the bus and driving an
/// acknowledge back to the host. Any response counts; only silence is
/// failure.
pub struct BtaProbe<B> {
    bridge: B,
}

impl<B: DsiHostBridge> BtaProbe<B> {
    /// Create a probe over the given bridge
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// Get access to the underlying bridge
    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Consume the probe and return the bridge
    pub fn into_bridge(self) -> B {
        self.bridge
    }
}

fn map_err(e: BridgeError) -> ProbeError {
    match e {
        BridgeError::ReadTimeout => ProbeError::Timeout,
        BridgeError::NoAck => ProbeError::Nack,
        BridgeError::Spi | BridgeError::Pin => ProbeError::Bus,
    }
}

impl<B: DsiHostBridge> StatusProbe for BtaProbe<B> {
    fn check_status(&mut self) -> Result<(), ProbeError> {
        let mut last = ProbeError::Timeout;
        for _ in 0..ATTEMPTS {
            match self.bridge.turnaround() {
                Ok(()) => return Ok(()),
                Err(e) => last = map_err(e),
            }
        }
        Err(last)
    }
}
