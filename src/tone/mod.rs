//! Tone generation on a single shared counter.
//!
//! Architecture:
//! - `ToneChannel`: one pin, one compare register, self-rescheduling
//! - `ToneEngine`: arms/disarms all channels together with the counter
//!
//! Interrupt latency must stay below the smallest half-period, otherwise the
//! counter passes a target before it is reprogrammed and that channel skips
//! a full counter wrap.

pub mod channel;
pub mod engine;

pub use channel::ToneChannel;
pub use engine::ToneEngine;
