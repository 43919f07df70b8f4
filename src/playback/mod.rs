//! Playback control: when the horn starts and when it stops.
//!
//! One state machine serves both firmware builds. What differs is the stop
//! condition, captured by [`ActivationPolicy`] and fixed at build time.

pub mod controller;

pub use controller::{PlaybackController, PlaybackState, StopReason, Transition};

/// How a playback ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationPolicy {
    /// Stop on counter overflow, one full wrap after the press.
    Timeout,
    /// Stop once the button is seen released after a wake-up.
    HoldToPlay,
}

impl ActivationPolicy {
    /// Playback ends on the counter overflow interrupt.
    #[inline]
    pub const fn stops_on_overflow(self) -> bool {
        matches!(self, ActivationPolicy::Timeout)
    }

    /// Playback ends when a poll sees the button released.
    #[inline]
    pub const fn stops_on_release(self) -> bool {
        matches!(self, ActivationPolicy::HoldToPlay)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ActivationPolicy::Timeout => "timeout",
            ActivationPolicy::HoldToPlay => "hold-to-play",
        }
    }
}
