//! Inter-task communication and the pipeline lock domain
//!
//! Defines the static signals, locks, and flags shared between the
//! watchdog, the frame-sync task, and the attach/teardown paths.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use argus_core::power::PanelPowerState;

use crate::panel::PanelCtrl;

/// Overlay/composition lock
///
/// Lock order is fixed: a path that needs both locks takes OVERLAY_LOCK
/// before PANEL_CTRL and releases it after. Taking PANEL_CTRL alone is
/// fine; taking OVERLAY_LOCK while already holding PANEL_CTRL is not.
pub static OVERLAY_LOCK: Mutex<CriticalSectionRawMutex, ()> = Mutex::new(());

/// Per-controller lock, owning everything a probe touches
///
/// `None` until the panel is attached, and again after detach.
pub static PANEL_CTRL: Mutex<CriticalSectionRawMutex, Option<PanelCtrl>> = Mutex::new(None);

/// Re-arm signal for the status watchdog, carrying the delay in
/// milliseconds until the next tick
///
/// A Signal holds at most one value, so at most one tick is ever
/// pending; re-arming an already-armed watchdog just replaces the delay.
pub static STATUS_REARM: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Last frame's hardware handoff (TE edge from the panel)
pub static FRAME_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// One-shot upstream notification that the panel is confirmed dead
pub static PANEL_DEAD: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Shutdown-pending flag, set by the teardown path before it starts
/// taking the pipeline apart
pub static SHUTDOWN_PENDING: AtomicBool = AtomicBool::new(false);

/// Pipeline-up flag, cleared when the display pipeline is torn down
pub static PIPELINE_ACTIVE: AtomicBool = AtomicBool::new(false);

const POWER_OFF: u8 = 0;
const POWER_TRANSITIONING: u8 = 1;
const POWER_ON: u8 = 2;

/// Panel power state mirror, written by the power path
static PANEL_POWER: AtomicU8 = AtomicU8::new(POWER_OFF);

/// Read the panel power state
pub fn panel_power() -> PanelPowerState {
    match PANEL_POWER.load(Ordering::Acquire) {
        POWER_ON => PanelPowerState::On,
        POWER_TRANSITIONING => PanelPowerState::Transitioning,
        _ => PanelPowerState::Off,
    }
}

/// Publish a new panel power state
pub fn set_panel_power(state: PanelPowerState) {
    let raw = match state {
        PanelPowerState::Off => POWER_OFF,
        PanelPowerState::Transitioning => POWER_TRANSITIONING,
        PanelPowerState::On => POWER_ON,
    };
    PANEL_POWER.store(raw, Ordering::Release);
}

/// Pipeline power as the watchdog precheck sees it: `None` once the
/// pipeline has been torn down
pub fn pipeline_power() -> Option<PanelPowerState> {
    if PIPELINE_ACTIVE.load(Ordering::Acquire) {
        Some(panel_power())
    } else {
        None
    }
}
