//! Panel controller bundle
//!
//! `PanelCtrl` aggregates everything a status probe touches. It lives
//! inside the controller mutex, so the probe, the clock gate, and the
//! liveness state can only be reached with the lock held.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;

use argus_core::config::PanelProfile;
use argus_core::status::PanelHealth;
use argus_core::traits::{FailureReporter, ProbeError, StatusProbe};
use argus_drivers::bridge::Ssd2825;
use argus_drivers::gate::{self, GpioClockGate};
use argus_drivers::probe::{BtaProbe, PowerModeProbe};

use crate::channels::PANEL_DEAD;

/// The concrete bridge on this board: SPI1 in blocking mode, with GPIO
/// chip-select and data/command lines
pub type Bridge =
    Ssd2825<Spi<'static, SPI1, Blocking>, Output<'static>, Output<'static>, Delay>;

/// Gate enable line adapter for the driver's pin trait
pub struct GatePin(pub Output<'static>);

impl gate::OutputPin for GatePin {
    fn set_high(&mut self) {
        self.0.set_high()
    }

    fn set_low(&mut self) {
        self.0.set_low()
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Probe flavor selected by the board configuration
pub enum PanelProbe {
    Bta(BtaProbe<Bridge>),
    PowerMode(PowerModeProbe<Bridge>),
}

impl StatusProbe for PanelProbe {
    fn check_status(&mut self) -> Result<(), ProbeError> {
        match self {
            PanelProbe::Bta(p) => p.check_status(),
            PanelProbe::PowerMode(p) => p.check_status(),
        }
    }
}

/// Everything a status probe touches, owned by the controller lock
pub struct PanelCtrl {
    pub probe: PanelProbe,
    pub gate: GpioClockGate<GatePin>,
    pub profile: PanelProfile,
    pub health: PanelHealth,
    /// Whether a TE line exists, i.e. whether the frame drain is available
    pub has_frame_sync: bool,
}

/// Upstream dead-panel notification over the `PANEL_DEAD` signal
pub struct SignalReporter;

impl FailureReporter for SignalReporter {
    fn panel_dead(&mut self) {
        PANEL_DEAD.signal(());
    }
}
