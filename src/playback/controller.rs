//! Idle/Playing state machine.
//!
//! ```text
//!            button edge (Idle only)
//!   Idle ─────────────────────────────▶ Playing
//!    ▲                                     │
//!    └──── overflow (Timeout) ─────────────┤
//!    └──── release poll (HoldToPlay) ──────┘
//! ```
//!
//! The button interrupt is masked for the whole of Playing, so a second
//! press cannot restart playback. The controller does not own any hardware;
//! every handler borrows what it needs for the duration of the call.

use super::ActivationPolicy;
use crate::config::HornConfig;
use crate::hal::gpio::{OutputPort, PlayButton, PortPins};
use crate::hal::timer::CompareTimer;
use crate::tone::ToneEngine;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Silent, button interrupt armed
    Idle,
    /// Tones running, button interrupt masked
    Playing,
}

/// Why a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Counter wrapped (Timeout policy)
    Overflow,
    /// Button seen released (HoldToPlay policy)
    Released,
}

/// State change performed by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Stopped(StopReason),
}

/// Playback state machine.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    policy: ActivationPolicy,
    status_led: PortPins,
    amp_enable: Option<PortPins>,
}

impl PlaybackController {
    pub const fn new(
        policy: ActivationPolicy,
        status_led: PortPins,
        amp_enable: Option<PortPins>,
    ) -> Self {
        Self {
            state: PlaybackState::Idle,
            policy,
            status_led,
            amp_enable,
        }
    }

    pub const fn from_config<const N: usize>(config: &HornConfig<N>) -> Self {
        Self::new(config.policy, config.status_led, config.amp_enable)
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    pub fn policy(&self) -> ActivationPolicy {
        self.policy
    }

    /// Button falling edge: Idle → Playing.
    ///
    /// The edge is acknowledged before the counter starts. Ignored while
    /// already playing.
    pub fn on_button_edge<const N: usize, T, P, B>(
        &mut self,
        engine: &mut ToneEngine<N>,
        timer: &mut T,
        port: &mut P,
        button: &mut B,
    ) -> Option<Transition>
    where
        T: CompareTimer,
        P: OutputPort,
        B: PlayButton,
    {
        if self.state != PlaybackState::Idle {
            return None;
        }

        button.disable_interrupt();
        button.clear_pending();

        if let Some(amp) = self.amp_enable {
            port.set_high(amp);
        }
        engine.start(timer, port, self.policy.stops_on_overflow());
        port.toggle(self.status_led);

        self.state = PlaybackState::Playing;
        Some(Transition::Started)
    }

    /// Counter overflow: Playing → Idle under the Timeout policy.
    pub fn on_counter_overflow<const N: usize, T, P, B>(
        &mut self,
        engine: &mut ToneEngine<N>,
        timer: &mut T,
        port: &mut P,
        button: &mut B,
    ) -> Option<Transition>
    where
        T: CompareTimer,
        P: OutputPort,
        B: PlayButton,
    {
        if self.state != PlaybackState::Playing || !self.policy.stops_on_overflow() {
            return None;
        }

        self.finish(engine, timer, port, button);
        Some(Transition::Stopped(StopReason::Overflow))
    }

    /// Release poll: Playing → Idle under HoldToPlay once the button is up.
    pub fn poll_release<const N: usize, T, P, B>(
        &mut self,
        engine: &mut ToneEngine<N>,
        timer: &mut T,
        port: &mut P,
        button: &mut B,
    ) -> Option<Transition>
    where
        T: CompareTimer,
        P: OutputPort,
        B: PlayButton,
    {
        if self.state != PlaybackState::Playing || !self.policy.stops_on_release() {
            return None;
        }
        if button.is_pressed() {
            return None;
        }

        self.finish(engine, timer, port, button);
        Some(Transition::Stopped(StopReason::Released))
    }

    /// Amp off before the tone pins are forced low, then re-arm the button.
    fn finish<const N: usize, T, P, B>(
        &mut self,
        engine: &mut ToneEngine<N>,
        timer: &mut T,
        port: &mut P,
        button: &mut B,
    ) where
        T: CompareTimer,
        P: OutputPort,
        B: PlayButton,
    {
        port.toggle(self.status_led);
        if let Some(amp) = self.amp_enable {
            port.set_low(amp);
        }
        engine.stop(timer, port);

        button.clear_pending();
        button.enable_interrupt();

        self.state = PlaybackState::Idle;
    }
}
