//! Multi-channel tone engine on one shared counter.
//!
//! Arms and disarms all channels as a unit together with the counter, so the
//! channels' `enabled` flags always agree with `counter_running` outside of
//! a single `start`/`stop` call.

use super::channel::ToneChannel;
use crate::config::HornConfig;
use crate::hal::gpio::{OutputPort, PortPins};
use crate::hal::timer::CompareTimer;

/// Fixed set of tone channels sharing one counter.
#[derive(Debug, Clone)]
pub struct ToneEngine<const N: usize> {
    channels: [ToneChannel; N],
    counter_running: bool,
}

impl<const N: usize> ToneEngine<N> {
    /// Channels must own distinct compare slots.
    pub const fn new(channels: [ToneChannel; N]) -> Self {
        Self {
            channels,
            counter_running: false,
        }
    }

    /// Channel `i` of the configuration owns compare slot `i`.
    pub fn from_config(config: &HornConfig<N>) -> Self {
        let mut slot = 0;
        Self::new(config.channels.map(|c| {
            let channel = ToneChannel::from_config(slot, &c);
            slot += 1;
            channel
        }))
    }

    /// Restart the counter from zero with every channel armed.
    ///
    /// `stop_on_overflow` enables the overflow interrupt that ends a
    /// fixed-duration playback.
    pub fn start<T, P>(&mut self, timer: &mut T, port: &mut P, stop_on_overflow: bool)
    where
        T: CompareTimer,
        P: OutputPort,
    {
        timer.halt();
        timer.clear();

        for channel in self.channels.iter_mut() {
            channel.arm(timer, port);
        }

        timer.enable_overflow_interrupt(stop_on_overflow);
        timer.run();
        self.counter_running = true;
    }

    /// Halt the counter, disarm every channel and drive all tone pins low.
    ///
    /// A toggle may have left a pin high right before the stop.
    pub fn stop<T, P>(&mut self, timer: &mut T, port: &mut P)
    where
        T: CompareTimer,
        P: OutputPort,
    {
        timer.halt();

        for channel in self.channels.iter_mut() {
            channel.disarm(timer);
        }

        timer.enable_overflow_interrupt(false);
        port.set_low(self.pins());
        self.counter_running = false;
    }

    /// Route a compare match to the channel owning `slot`.
    ///
    /// Returns `false` for an unknown slot or a disarmed channel.
    #[inline]
    pub fn on_compare_match<T, P>(&mut self, slot: usize, timer: &mut T, port: &mut P) -> bool
    where
        T: CompareTimer,
        P: OutputPort,
    {
        match self.channels.iter_mut().find(|c| c.slot() == slot) {
            Some(channel) => channel.on_compare_match(timer, port),
            None => false,
        }
    }

    /// All channel output bits.
    pub fn pins(&self) -> PortPins {
        self.channels
            .iter()
            .fold(PortPins::empty(), |pins, c| pins | c.pin())
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.counter_running
    }

    /// Every channel's `enabled` flag agrees with the counter state.
    pub fn is_consistent(&self) -> bool {
        self.channels
            .iter()
            .all(|c| c.is_enabled() == self.counter_running)
    }

    pub fn channels(&self) -> &[ToneChannel; N] {
        &self.channels
    }
}
