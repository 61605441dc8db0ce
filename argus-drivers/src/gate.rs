//! GPIO clock/power gate
//!
//! Holds the bridge's clock domain active for the span of a probe via a
//! GPIO-controlled enable line (directly or through a clock buffer IC).

use argus_core::traits::ClockGate;

/// Trait for GPIO pin abstraction
pub trait OutputPin {
    /// Set the pin high
    fn set_high(&mut self);

    /// Set the pin low
    fn set_low(&mut self);

    /// Check if the pin is set high
    fn is_set_high(&self) -> bool;
}

/// GPIO-driven clock gate
///
/// The enable line can be active-high (default) or active-low.
pub struct GpioClockGate<P> {
    pin: P,
    /// If true, gate enabled = pin LOW
    inverted: bool,
    /// Current logical state (true = gate held active)
    enabled: bool,
}

impl<P: OutputPin> GpioClockGate<P> {
    /// Create a new gate
    ///
    /// The gate starts released.
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut gate = Self {
            pin,
            inverted,
            enabled: false,
        };
        gate.apply(false);
        gate
    }

    /// Create a gate with an active-high enable line
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a gate with an active-low enable line
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Check whether the gate is currently held active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&mut self, enabled: bool) {
        self.enabled = enabled;

        if enabled != self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

impl<P: OutputPin> ClockGate for GpioClockGate<P> {
    fn enable(&mut self) {
        self.apply(true);
    }

    fn disable(&mut self) {
        self.apply(false);
    }
}
