//! Status probe, clock gate, and failure reporting traits

/// Errors a liveness probe can come back with
///
/// The watchdog does not distinguish between variants: any error means
/// the panel is not responding. The variants exist for the drivers'
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    /// Panel never acknowledged the handshake
    Timeout,
    /// Panel answered, but with the wrong status
    Nack,
    /// The transport to the panel failed
    Bus,
}

/// One liveness handshake with the panel
///
/// Implementations must only be called while the pipeline lock domain is
/// held and the clock gate is active; the handshake shares the command
/// bus with frame commits.
pub trait StatusProbe {
    /// Perform one handshake
    ///
    /// `Ok(())` means the panel is alive; any error means it is not
    /// responding.
    fn check_status(&mut self) -> Result<(), ProbeError>;
}

/// Clock/power gate for the probe's bus domain
///
/// Both operations are idempotent; `enable` and `disable` calls are
/// always paired around a single probe.
pub trait ClockGate {
    /// Hold the bus clock domain active
    fn enable(&mut self);

    /// Release the bus clock domain
    fn disable(&mut self);
}

/// Upstream sink for the terminal dead-panel notification
///
/// Fire-and-forget; called at most once per panel lifetime, after the
/// pipeline locks have been released.
pub trait FailureReporter {
    /// Report that the panel is confirmed dead
    fn panel_dead(&mut self);
}
