//! Panel status watchdog task
//!
//! One self-rescheduling task per panel. Each tick walks the decision
//! pipeline from argus-core:
//!
//! 1. Precheck from an unlocked snapshot (binding, dead state, pipeline,
//!    power)
//! 2. Lock acquisition in fixed order: overlay (command mode only), then
//!    controller
//! 3. Teardown recheck inside the locks
//! 4. Frame drain, skipped for recovery re-checks
//! 5. Probe with the clock gate held; the state write happens while both
//!    locks are still held
//! 6. Release in reverse order, then the outcome from a fresh snapshot
//!
//! The task never holds the locks across re-arm or report. Re-arm goes
//! through the STATUS_REARM signal, which can hold at most one pending
//! tick.

use defmt::*;
use embassy_time::{with_timeout, Duration, Timer};
use portable_atomic::Ordering;

use argus_core::status::{LockedCheck, Precheck, TickContext, TickOutcome};
use argus_core::traits::{ClockGate, FailureReporter, StatusProbe};

use crate::channels::{
    panel_power, pipeline_power, FRAME_DONE, OVERLAY_LOCK, PANEL_CTRL, SHUTDOWN_PENDING,
    STATUS_REARM,
};
use crate::panel::SignalReporter;

/// Upper bound on the frame drain wait
///
/// A wedged pipeline must not park the watchdog: a timed-out drain falls
/// through to the probe, which is what will then fail definitively.
const DRAIN_TIMEOUT_MS: u64 = 100;

/// Panel status watchdog task
#[embassy_executor::task]
pub async fn panel_status_task() {
    info!("Panel status watchdog started");

    loop {
        let interval_ms = STATUS_REARM.wait().await;
        Timer::after(Duration::from_millis(interval_ms as u64)).await;
        tick(interval_ms).await;
    }
}

/// One watchdog tick
async fn tick(interval_ms: u32) {
    // Unlocked-phase snapshot. The controller mutex is taken briefly on
    // its own here; the overlay-then-controller order applies to the
    // probe section, where both locks are held together.
    let precheck = {
        let ctrl = PANEL_CTRL.lock().await;
        match ctrl.as_ref() {
            Some(ctrl) => ctrl.health.precheck(TickContext {
                bound: true,
                pipeline_power: pipeline_power(),
                mode: ctrl.profile.mode,
            }),
            None => Precheck::Stop,
        }
    };

    let plan = match precheck {
        Precheck::Stop => {
            warn!("status tick: panel unavailable or dead, checks stopped");
            return;
        }
        Precheck::Reschedule => {
            debug!("status tick: panel not probeable, re-armed");
            STATUS_REARM.signal(interval_ms);
            return;
        }
        Precheck::Probe(plan) => plan,
    };

    // Fixed acquisition order: overlay before controller.
    let overlay = if plan.take_overlay {
        Some(OVERLAY_LOCK.lock().await)
    } else {
        None
    };
    let mut ctrl_guard = PANEL_CTRL.lock().await;

    // On every early return below, scope drop releases the guards in
    // reverse declaration order: controller first, then overlay.
    let Some(ctrl) = ctrl_guard.as_mut() else {
        // Panel detached between the snapshot and the lock.
        return;
    };

    // Teardown recheck inside the locks: a shutdown in progress wins.
    let drain = match ctrl.health.locked_check(
        panel_power(),
        SHUTDOWN_PENDING.load(Ordering::Acquire),
        ctrl.has_frame_sync,
    ) {
        LockedCheck::Abort => {
            warn!("status tick: panel turning off, skipping check");
            return;
        }
        LockedCheck::Continue { drain } => drain,
    };

    // Wait out the last frame's handoff before the handshake.
    if drain {
        FRAME_DONE.reset();
        if with_timeout(Duration::from_millis(DRAIN_TIMEOUT_MS), FRAME_DONE.wait())
            .await
            .is_err()
        {
            debug!("status tick: frame drain timed out");
        }
    }

    // The handshake, with the clock gate held exactly across it.
    ctrl.gate.enable();
    let result = ctrl.probe.check_status();
    ctrl.gate.disable();

    if let Err(e) = result {
        warn!("status probe failed: {}", e);
    }
    let alive = result.is_ok();
    let transition = ctrl.health.record_probe(alive);

    // Release in reverse acquisition order: controller, then overlay.
    drop(ctrl_guard);
    drop(overlay);

    // Outcome from a fresh snapshot; a power-off that raced the probe
    // suppresses both re-arm and report.
    match TickOutcome::decide(panel_power(), alive, transition) {
        TickOutcome::Reschedule => STATUS_REARM.signal(interval_ms),
        TickOutcome::ReportDead => {
            error!("panel confirmed dead, reporting upstream");
            SignalReporter.panel_dead();
        }
        TickOutcome::Suppress => {
            debug!("status tick: power-off superseded the result");
        }
    }
}
