//! Power-mode register liveness probe
//!
//! Some panels keep acknowledging bus turnarounds while their controller
//! is wedged. For those, liveness means "the power-mode register still
//! reads the expected display-on value".

use argus_core::traits::{ProbeError, StatusProbe};

use crate::bridge::{dcs, BridgeError, DsiHostBridge};

/// Liveness probe via DCS power-mode register compare
pub struct PowerModeProbe<B> {
    bridge: B,
    expected: u8,
}

impl<B: DsiHostBridge> PowerModeProbe<B> {
    /// Create a probe expecting the given power-mode byte
    ///
    /// `expected` comes from the panel profile; for a panel that is awake
    /// and displaying this is typically booster on, sleep-out, normal
    /// mode, display on.
    pub fn new(bridge: B, expected: u8) -> Self {
        Self { bridge, expected }
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

impl<B: DsiHostBridge> StatusProbe for PowerModeProbe<B> {
    fn check_status(&mut self) -> Result<(), ProbeError> {
        let mut buf = [0u8; 1];
        let count = self.bridge.dcs_read(dcs::GET_POWER_MODE, &mut buf).map_err(|e| match e {
            BridgeError::ReadTimeout => ProbeError::Timeout,
            BridgeError::NoAck => ProbeError::Nack,
            BridgeError::Spi | BridgeError::Pin => ProbeError::Bus,
        })?;

        if count == 1 && buf[0] == self.expected {
            Ok(())
        } else {
            Err(ProbeError::Nack)
        }
    }
}
