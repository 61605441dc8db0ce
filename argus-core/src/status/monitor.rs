//! Per-tick decision pipeline for the panel status watchdog
//!
//! One watchdog tick walks a strict check sequence: precheck from an
//! unlocked snapshot, a recheck after the pipeline locks are taken, the
//! probe itself, then the outcome from a fresh post-unlock snapshot.
//! Each stage consumes the previous stage's answer, so a sequencer
//! cannot reorder them.
//!
//! The stages here only decide; the sequencer that owns the locks, the
//! clock gate, and the timer executes the decisions. Every possible
//! answer is one of: probe now, re-arm without probing, or stand down.

use crate::power::{PanelPowerState, SignalingMode};

use super::health::{DeadState, DeadTransition, PanelHealth};

/// Unlocked snapshot taken at tick entry
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Panel descriptor, platform data, and probe callback all resolved
    pub bound: bool,
    /// Pipeline control power state, or `None` when the pipeline itself
    /// has been torn down
    pub pipeline_power: Option<PanelPowerState>,
    /// The panel's update discipline
    pub mode: SignalingMode,
}

/// Which locks the probe section must take, in acquisition order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPlan {
    /// Overlay lock first, and only for command-mode panels
    pub take_overlay: bool,
}

/// Answer of the unlocked precheck
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum Precheck {
    /// Permanent misconfiguration or terminal state: no probe, no re-arm
    Stop,
    /// Transient condition: re-arm at the configured interval, skip the probe
    Reschedule,
    /// Healthy enough to probe; take the locks per the plan
    Probe(LockPlan),
}

/// Answer of the recheck performed while holding both locks
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum LockedCheck {
    /// Shutdown or power-off raced in; release the locks in reverse order
    /// and stand down without re-arming
    Abort,
    /// Proceed to the handshake
    Continue {
        /// Wait for the last frame's hardware handoff before probing
        drain: bool,
    },
}

/// Answer of the post-unlock outcome step
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Panel responded: re-arm for the next period
    Reschedule,
    /// Panel confirmed dead this tick: deliver the one-shot report, then
    /// stop re-arming for this panel's lifetime
    ReportDead,
    /// A concurrent power-off superseded the result: no re-arm, no report
    Suppress,
}

impl PanelHealth {
    /// Steps 1-5: decide from an unlocked snapshot whether to probe at all
    ///
    /// A missing binding or a torn-down pipeline is treated as permanent
    /// (`Stop`); blanked-recovery and powered-off panels stay on the timer
    /// (`Reschedule`) so probing resumes when they come back.
    pub fn precheck(&self, ctx: TickContext) -> Precheck {
        if !ctx.bound {
            return Precheck::Stop;
        }

        match self.dead_state() {
            DeadState::ConfirmedDead => return Precheck::Stop,
            DeadState::BlankRecovery => return Precheck::Reschedule,
            DeadState::None | DeadState::CheckPending => {}
        }

        let Some(power) = ctx.pipeline_power else {
            return Precheck::Stop;
        };
        if power.is_off() {
            return Precheck::Reschedule;
        }

        Precheck::Probe(LockPlan {
            take_overlay: ctx.mode.needs_overlay_lock(),
        })
    }

    /// Steps 7-8: recheck under the locks, and decide about the drain
    ///
    /// A shutdown in progress takes precedence over health checking. The
    /// frame drain is requested only when the pipeline offers one and the
    /// tick is not a recovery re-check: a `CheckPending` probe must not
    /// wait on frame handoff that itself depends on the panel responding.
    pub fn locked_check(
        &self,
        power: PanelPowerState,
        shutdown_pending: bool,
        drain_available: bool,
    ) -> LockedCheck {
        if power.is_off() || shutdown_pending {
            return LockedCheck::Abort;
        }

        LockedCheck::Continue {
            drain: drain_available && self.dead_state() != DeadState::CheckPending,
        }
    }
}

impl TickOutcome {
    /// Step 11: decide the outcome from a fresh post-unlock power snapshot
    ///
    /// The snapshot must be taken after the locks are released; a
    /// power-off that raced the probe wins, and the tick's result is
    /// dropped rather than re-armed against a panel being torn down.
    /// This is a free function of the snapshot so the sequencer can call
    /// it without re-entering the lock domain.
    pub fn decide(
        power: PanelPowerState,
        alive: bool,
        transition: Option<DeadTransition>,
    ) -> TickOutcome {
        if power.is_off() {
            return TickOutcome::Suppress;
        }

        match transition {
            Some(DeadTransition) => TickOutcome::ReportDead,
            None if alive => TickOutcome::Reschedule,
            None => TickOutcome::Suppress,
        }
    }
}
