//! Self-rescheduling square-wave channel.
//!
//! Each channel owns one compare register of the shared counter. On every
//! match it toggles its pin and moves its compare value forward by one
//! half-period. The counter never resets while playing, so the compare value
//! wraps together with it and every channel keeps its own phase.

use crate::config::ChannelConfig;
use crate::hal::gpio::{OutputPort, PortPins};
use crate::hal::timer::{CompareTimer, Ticks};

/// One square-wave output driven from a compare register.
#[derive(Debug, Clone)]
pub struct ToneChannel {
    /// Counter ticks between toggles
    half_period_ticks: Ticks,
    /// Counter value of the next toggle
    next_compare: Ticks,
    /// Output bit
    pin: PortPins,
    /// Compare register owned by this channel
    slot: usize,
    enabled: bool,
}

impl ToneChannel {
    /// Create a disarmed channel.
    pub const fn new(slot: usize, half_period_ticks: Ticks, pin: PortPins) -> Self {
        Self {
            half_period_ticks,
            next_compare: 0,
            pin,
            slot,
            enabled: false,
        }
    }

    /// Create a disarmed channel from its configuration.
    pub const fn from_config(slot: usize, config: &ChannelConfig) -> Self {
        Self::new(slot, config.half_period_ticks, config.pin)
    }

    /// Start toggling one half-period from the current count.
    ///
    /// The pin starts low.
    pub fn arm<T, P>(&mut self, timer: &mut T, port: &mut P)
    where
        T: CompareTimer,
        P: OutputPort,
    {
        self.enabled = true;
        self.next_compare = timer.count().wrapping_add(self.half_period_ticks);
        port.set_low(self.pin);
        timer.set_compare(self.slot, self.next_compare);
        timer.enable_compare_interrupt(self.slot, true);
    }

    /// Compare-match handler body.
    ///
    /// Returns `false` (and does nothing) if the channel is disarmed.
    #[inline]
    pub fn on_compare_match<T, P>(&mut self, timer: &mut T, port: &mut P) -> bool
    where
        T: CompareTimer,
        P: OutputPort,
    {
        if !self.enabled {
            return false;
        }

        port.toggle(self.pin);
        self.next_compare = self.next_compare.wrapping_add(self.half_period_ticks);
        timer.set_compare(self.slot, self.next_compare);
        true
    }

    /// Stop toggling. The pin is left as is.
    pub fn disarm<T: CompareTimer>(&mut self, timer: &mut T) {
        self.enabled = false;
        timer.enable_compare_interrupt(self.slot, false);
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn half_period_ticks(&self) -> Ticks {
        self.half_period_ticks
    }

    /// Counter value of the next toggle.
    #[inline]
    pub fn next_compare(&self) -> Ticks {
        self.next_compare
    }

    #[inline]
    pub fn pin(&self) -> PortPins {
        self.pin
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }
}
