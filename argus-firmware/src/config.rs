//! Board configuration
//!
//! Fixed per board at build time. The check interval is the watchdog's
//! one runtime tunable; it is read once when the watchdog is armed at
//! panel attach.

use heapless::String;

use argus_core::config::{PanelProfile, StatusCheckConfig};
use argus_core::power::SignalingMode;

/// Attached panel: Sharp LQ101R1SX01 in command mode behind the SSD2825
pub fn panel_profile() -> PanelProfile {
    PanelProfile {
        name: String::try_from("LQ101R1SX01").unwrap_or_default(),
        mode: SignalingMode::Command,
        power_mode_bits: 0x9C,
    }
}

/// Status-check settings for this board
pub fn status_check() -> StatusCheckConfig {
    StatusCheckConfig::default()
}
