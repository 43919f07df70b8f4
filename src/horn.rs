//! Module: horn
//!
//! Purpose: Single owner of every resource the horn touches.
//!
//! Architecture:
//! - Owns the shared timer, the output port, the button, the tone engine and
//!   the playback controller
//! - Interrupt entry points take `&mut self`: whoever is running a handler
//!   holds exclusive write authority over the counter and compare registers
//! - The idle loop only ever starts or stops the counter as a whole, through
//!   the controller
//!
//! Safety: Safe. Exclusive access is enforced by the borrow checker here and
//! by [`crate::shared::SharedHorn`] across interrupt contexts.

use crate::config::{ConfigError, HornConfig};
use crate::hal::gpio::{OutputPort, PlayButton, PortPins};
use crate::hal::soft_timer::SoftTimer;
use crate::hal::timer::{CompareTimer, TimerEvent};
use crate::idle::ReleasePoll;
use crate::log_globals::EVENT_LOG;
use crate::logging::LogStream;
use crate::playback::{ActivationPolicy, PlaybackController, PlaybackState, Transition};
use crate::tone::ToneEngine;
use crate::{rt_debug, rt_info, rt_warn};

/// Diagnostic counters since reset. Never affect control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HornStats {
    /// Playbacks started.
    pub plays: u32,
    /// Timer vector entries with no source, or matches on disarmed channels.
    pub spurious_interrupts: u32,
}

/// The horn firmware: tone engine, playback state machine and their hardware.
pub struct Horn<T, P, B, const N: usize> {
    timer: T,
    port: P,
    button: B,
    engine: ToneEngine<N>,
    controller: PlaybackController,
    idle_outputs: PortPins,
    log: &'static LogStream,
    stats: HornStats,
}

impl<T, P, B, const N: usize> Horn<T, P, B, N>
where
    T: CompareTimer,
    P: OutputPort,
    B: PlayButton,
{
    /// Take ownership of the hardware and enter Idle.
    ///
    /// All outputs are driven low. The button interrupt stays masked until
    /// [`Horn::arm_button`], so board code can publish the horn to its
    /// interrupt handlers first.
    pub fn new(config: &HornConfig<N>, timer: T, port: P, button: B) -> Result<Self, ConfigError> {
        config.validate()?;
        if timer.slots() < N {
            return Err(ConfigError::NotEnoughCompareSlots {
                needed: N,
                available: timer.slots(),
            });
        }

        let mut idle_outputs = config.tone_pins() | config.status_led;
        if let Some(amp) = config.amp_enable {
            idle_outputs |= amp;
        }

        let mut horn = Self {
            timer,
            port,
            button,
            engine: ToneEngine::from_config(config),
            controller: PlaybackController::from_config(config),
            idle_outputs,
            log: &EVENT_LOG,
            stats: HornStats::default(),
        };
        horn.enter_idle();
        Ok(horn)
    }

    /// Log into `log` instead of the global event log.
    pub fn with_log(mut self, log: &'static LogStream) -> Self {
        self.log = log;
        self
    }

    fn enter_idle(&mut self) {
        self.engine.stop(&mut self.timer, &mut self.port);
        self.timer.clear();
        self.port.set_low(self.idle_outputs);
        self.button.disable_interrupt();
        self.button.clear_pending();
    }

    /// Acknowledge any stale edge and let the button interrupt fire.
    ///
    /// No-op while playing; the stop path re-arms the button itself.
    pub fn arm_button(&mut self) {
        if self.controller.is_playing() {
            return;
        }
        self.button.clear_pending();
        self.button.enable_interrupt();
    }

    /// Button edge interrupt handler.
    pub fn on_button_interrupt(&mut self) -> Option<Transition> {
        let transition = self.controller.on_button_edge(
            &mut self.engine,
            &mut self.timer,
            &mut self.port,
            &mut self.button,
        );

        match transition {
            Some(_) => {
                self.stats.plays = self.stats.plays.wrapping_add(1);
                rt_info!(
                    self.log,
                    self.ticks(),
                    "play #{} ({})",
                    self.stats.plays,
                    self.controller.policy().as_str()
                );
            }
            None => {
                // Masked while playing; only a stale edge gets here.
                self.button.clear_pending();
                rt_warn!(self.log, self.ticks(), "button edge while playing");
            }
        }

        transition
    }

    /// Timer interrupt handler: read the vector once and handle that source.
    pub fn on_timer_interrupt(&mut self) -> Option<Transition> {
        let event = self.timer.take_event();
        self.dispatch(event)
    }

    /// Read the vector until no source is pending.
    ///
    /// Returns the last transition performed, if any.
    pub fn service_timer(&mut self) -> Option<Transition> {
        let mut transition = None;
        loop {
            match self.timer.take_event() {
                TimerEvent::None => return transition,
                event => {
                    if let Some(t) = self.dispatch(event) {
                        transition = Some(t);
                    }
                }
            }
        }
    }

    /// Handle one timer vector source.
    #[inline]
    pub fn dispatch(&mut self, event: TimerEvent) -> Option<Transition> {
        match event {
            TimerEvent::None => {
                self.stats.spurious_interrupts = self.stats.spurious_interrupts.wrapping_add(1);
                rt_debug!(self.log, self.ticks(), "timer vector: no source");
                None
            }
            TimerEvent::Compare(slot) => {
                if !self
                    .engine
                    .on_compare_match(slot, &mut self.timer, &mut self.port)
                {
                    self.stats.spurious_interrupts =
                        self.stats.spurious_interrupts.wrapping_add(1);
                }
                None
            }
            TimerEvent::Overflow => {
                let transition = self.controller.on_counter_overflow(
                    &mut self.engine,
                    &mut self.timer,
                    &mut self.port,
                    &mut self.button,
                );
                if transition.is_some() {
                    rt_info!(self.log, self.ticks(), "stop: counter wrapped");
                }
                transition
            }
        }
    }

    /// One release poll for the idle loop.
    pub fn poll_release(&mut self) -> ReleasePoll {
        if !self.controller.is_playing() || !self.controller.policy().stops_on_release() {
            return ReleasePoll::Inactive;
        }

        match self.controller.poll_release(
            &mut self.engine,
            &mut self.timer,
            &mut self.port,
            &mut self.button,
        ) {
            Some(_) => {
                rt_info!(self.log, self.ticks(), "stop: button released");
                ReleasePoll::Released
            }
            None => ReleasePoll::Held,
        }
    }

    #[inline]
    fn ticks(&self) -> u32 {
        self.timer.count() as u32
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn policy(&self) -> ActivationPolicy {
        self.controller.policy()
    }

    pub fn stats(&self) -> HornStats {
        self.stats
    }

    pub fn engine(&self) -> &ToneEngine<N> {
        &self.engine
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn button(&self) -> &B {
        &self.button
    }

    /// Mutable access to the button, for board glue and test rigs.
    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }
}

impl<P, B, const N: usize> Horn<SoftTimer<N>, P, B, N>
where
    P: OutputPort,
    B: PlayButton,
{
    /// One counter clock of the software timer.
    ///
    /// Services the timer vector if the tick latched a source.
    #[inline]
    pub fn clock_tick(&mut self) -> Option<Transition> {
        if self.timer.tick() {
            self.service_timer()
        } else {
            None
        }
    }
}
