//! # RustTrainHorn
//!
//! Three-tone train horn on one free-running timer.
//!
//! ## Architecture
//!
//! ```text
//! button edge ──▶ PlaybackController ──▶ ToneEngine.start()
//!                                            │
//! counter ticks ──▶ TimerEvent::Compare(n) ──▶ ToneChannel n: toggle pin,
//!                                              next_compare += half_period
//!
//! TimerEvent::Overflow (Timeout)    ─┐
//! release poll (HoldToPlay)         ─┴▶ ToneEngine.stop(), button re-armed
//! ```
//!
//! - Every channel reschedules itself, so one counter carries N frequencies
//! - [`Horn`] owns all hardware; handlers borrow it exclusively
//! - Timeout vs hold-to-play is a build-time [`ActivationPolicy`]

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod hal;
pub mod horn;
pub mod idle;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod playback;
pub mod shared;
pub mod tone;

pub use config::{ConfigError, HornConfig, CONFIG};
pub use hal::{CompareTimer, OutputPort, PlayButton, PortPins, SoftTimer, TimerEvent};
pub use horn::{Horn, HornStats};
pub use idle::ReleasePoll;
pub use log_globals::EVENT_LOG;
pub use playback::{ActivationPolicy, PlaybackState, StopReason, Transition};
pub use shared::SharedHorn;
pub use tone::{ToneChannel, ToneEngine};
