//! Panel power and signaling-mode types
//!
//! Power state is owned by the pipeline's power machinery; the watchdog
//! only ever reads it.

/// Panel power state as seen by the watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelPowerState {
    /// Panel rail is down; the panel cannot be probed
    Off,
    /// A power transition is in flight
    Transitioning,
    /// Panel fully powered
    On,
}

impl PanelPowerState {
    /// Check whether the panel is powered off
    ///
    /// `Transitioning` counts as powered: only a hard `Off` defers or
    /// suppresses a status check.
    pub fn is_off(&self) -> bool {
        matches!(self, PanelPowerState::Off)
    }
}

/// Panel update discipline
///
/// Command-mode panels are written with explicit DCS commands and need the
/// overlay lock held around a status probe so the probe cannot interleave
/// with a frame commit. Video-mode panels stream continuously and their
/// pipeline's own flow control already serializes bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalingMode {
    /// DCS command mode with explicit frame commits
    #[default]
    Command,
    /// Continuous video streaming
    Video,
}

impl SignalingMode {
    /// Check whether probing in this mode requires the overlay lock
    pub fn needs_overlay_lock(&self) -> bool {
        matches!(self, SignalingMode::Command)
    }
}
