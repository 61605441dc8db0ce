//! Argus - DSI panel liveness watchdog firmware
//!
//! Main firmware binary for RP2040-based boards driving a MIPI-DSI
//! panel through an SSD2825 SPI bridge.
//!
//! Named after Argus Panoptes, the hundred-eyed watchman - the guard
//! who never stops watching.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use argus_core::config::ProbeKind;
use argus_core::power::PanelPowerState;
use argus_core::status::PanelHealth;
use argus_drivers::bridge::{Ssd2825, Ssd2825Config};
use argus_drivers::gate::GpioClockGate;
use argus_drivers::probe::{BtaProbe, PowerModeProbe};

use crate::channels::{set_panel_power, PANEL_CTRL, PIPELINE_ACTIVE, STATUS_REARM};
use crate::panel::{GatePin, PanelCtrl, PanelProbe};

mod channels;
mod config;
mod panel;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Argus firmware starting...");

    let p = embassy_rp::init(Default::default());

    // SPI1 to the SSD2825 bridge
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = 1_000_000;
    let spi = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, spi_config);
    let cs = Output::new(p.PIN_13, Level::High);
    let dc = Output::new(p.PIN_14, Level::Low);

    let mut bridge = Ssd2825::new(spi, cs, dc, Delay, Ssd2825Config::default());
    match bridge.device_id() {
        Ok(id) => info!("SSD2825 bridge found, id {:x}", id),
        Err(_) => warn!("SSD2825 bridge not responding at attach"),
    }

    let profile = config::panel_profile();
    let check = config::status_check();
    info!("Panel profile: {}", profile.name.as_str());

    let probe = match check.probe {
        ProbeKind::Bta => PanelProbe::Bta(BtaProbe::new(bridge)),
        ProbeKind::PowerModeReg => {
            PanelProbe::PowerMode(PowerModeProbe::new(bridge, profile.power_mode_bits))
        }
    };
    let gate = GpioClockGate::new_active_high(GatePin(Output::new(p.PIN_15, Level::Low)));

    // Attach the panel: publish the controller, bring the pipeline up.
    {
        let mut ctrl = PANEL_CTRL.lock().await;
        *ctrl = Some(PanelCtrl {
            probe,
            gate,
            profile,
            health: PanelHealth::new(),
            has_frame_sync: true,
        });
    }
    PIPELINE_ACTIVE.store(true, portable_atomic::Ordering::Release);
    set_panel_power(PanelPowerState::On);

    // TE line from the panel
    let te = Input::new(p.PIN_16, Pull::Down);
    spawner.spawn(tasks::frame_sync_task(te)).unwrap();
    spawner.spawn(tasks::panel_status_task()).unwrap();

    // Arm the watchdog.
    if check.enabled {
        info!(
            "Arming panel status watchdog, interval {} ms",
            check.interval_ms
        );
        STATUS_REARM.signal(check.interval_ms);
    }
}
