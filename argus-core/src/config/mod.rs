//! Configuration type definitions
//!
//! The watchdog has exactly one runtime tunable, the check interval; the
//! rest of the configuration describes the attached panel and is fixed
//! at build time per board.

use heapless::String;

use crate::power::SignalingMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum panel name length
pub const MAX_LABEL_LEN: usize = 16;

/// Default check interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u32 = 5000;

/// Which liveness probe the watchdog uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProbeKind {
    /// Bus-turnaround acknowledge: the panel proves it can drive the bus
    #[default]
    Bta,
    /// DCS power-mode register read compared against the expected bits
    PowerModeReg,
}

/// Status-check configuration
///
/// `interval_ms` is supplied once at watchdog creation and is constant
/// for the watchdog's lifetime.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusCheckConfig {
    /// Whether the watchdog is spawned at all
    pub enabled: bool,
    /// Probe period in milliseconds
    pub interval_ms: u32,
    /// Which probe flavor the panel supports
    pub probe: ProbeKind,
}

impl Default for StatusCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: DEFAULT_INTERVAL_MS,
            probe: ProbeKind::default(),
        }
    }
}

/// Static description of the attached panel
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelProfile {
    /// Name used in diagnostics
    pub name: String<MAX_LABEL_LEN>,
    /// Update discipline (decides the overlay-lock requirement)
    pub mode: SignalingMode,
    /// Expected DCS power-mode bits for `ProbeKind::PowerModeReg`:
    /// booster on, sleep-out, normal mode, display on
    pub power_mode_bits: u8,
}

impl Default for PanelProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: SignalingMode::Command,
            power_mode_bits: 0x9C,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatusCheckConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval_ms, 5000);
        assert_eq!(config.probe, ProbeKind::Bta);
    }

    #[test]
    fn test_default_profile_expects_display_on() {
        let profile = PanelProfile::default();
        assert_eq!(profile.mode, SignalingMode::Command);
        // Sleep-out and display-on must both be part of the expected bits.
        assert_eq!(profile.power_mode_bits & 0x14, 0x14);
    }
}
