//! Module: config
//!
//! Purpose: Compile-time configuration for RustTrainHorn.
//!
//! Architecture:
//! - `HornConfig`: tick rate, tone channels, control pins, activation policy
//! - presets: one per firmware build, picked by cargo feature
//! - `CONFIG`: the active preset, validated in a `const` item
//!
//! Nothing here is mutable at runtime and nothing is persisted.

mod error;
pub mod presets;

pub use error::ConfigError;
pub use presets::{HOLD_HORN, TIMEOUT_HORN};

use crate::hal::gpio::PortPins;
use crate::hal::timer::{Ticks, COUNTER_MODULUS};
use crate::playback::ActivationPolicy;

/// Counter clock (32.768 kHz crystal).
pub const TICK_RATE_HZ: u32 = 32_768;

/// Smallest accepted half-period.
///
/// The compare handler must finish before the counter reaches the next
/// target, so every channel needs at least this many ticks between toggles.
pub const MIN_HALF_PERIOD_TICKS: Ticks = 8;

/// Tone channels in every shipped build.
pub const CHANNELS: usize = 3;

/// One square-wave output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Note name, for logs.
    pub name: &'static str,
    /// Counter ticks between toggles.
    pub half_period_ticks: Ticks,
    /// Output bit.
    pub pin: PortPins,
    /// Intended pitch in 1/100 Hz; `half_period_ticks` is its nearest fit.
    pub target_centihz: u32,
}

impl ChannelConfig {
    /// Frequency actually produced at `tick_rate_hz`, in 1/100 Hz.
    #[inline]
    pub const fn achieved_centihz(&self, tick_rate_hz: u32) -> u32 {
        frequency_centihz(tick_rate_hz, self.half_period_ticks)
    }

    /// `half_period_ticks` is the nearest half-period to the target pitch.
    pub const fn is_tuned(&self, tick_rate_hz: u32) -> bool {
        half_period_for(self.target_centihz, tick_rate_hz) == self.half_period_ticks
    }
}

/// Complete description of one horn build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HornConfig<const N: usize> {
    pub tick_rate_hz: u32,
    pub channels: [ChannelConfig; N],
    /// Status indicator, toggled on every transition.
    pub status_led: PortPins,
    /// Active-low play button.
    pub button: PortPins,
    /// Audio amplifier enable, driven high while playing.
    pub amp_enable: Option<PortPins>,
    pub policy: ActivationPolicy,
}

impl<const N: usize> HornConfig<N> {
    /// Check the configuration for build-time defects.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if N == 0 {
            return Err(ConfigError::NoChannels);
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        let mut used = match claim(0, self.button) {
            Ok(used) => used,
            Err(e) => return Err(e),
        };
        used = match claim(used, self.status_led) {
            Ok(used) => used,
            Err(e) => return Err(e),
        };
        if let Some(amp) = self.amp_enable {
            used = match claim(used, amp) {
                Ok(used) => used,
                Err(e) => return Err(e),
            };
        }

        let mut i = 0;
        while i < N {
            let channel = &self.channels[i];
            if channel.half_period_ticks == 0 {
                return Err(ConfigError::ZeroHalfPeriod { channel: i });
            }
            if channel.half_period_ticks < MIN_HALF_PERIOD_TICKS {
                return Err(ConfigError::HalfPeriodTooShort { channel: i });
            }
            used = match claim(used, channel.pin) {
                Ok(used) => used,
                Err(e) => return Err(e),
            };
            i += 1;
        }

        Ok(())
    }

    /// All channel output bits.
    pub const fn tone_pins(&self) -> PortPins {
        let mut bits = 0u8;
        let mut i = 0;
        while i < N {
            bits |= self.channels[i].pin.bits();
            i += 1;
        }
        PortPins::from_bits_retain(bits)
    }

    /// Every channel is tuned to its target pitch.
    pub const fn is_tuned(&self) -> bool {
        let mut i = 0;
        while i < N {
            if !self.channels[i].is_tuned(self.tick_rate_hz) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Timeout-policy playback length: one full counter wrap, in ms.
    pub const fn wrap_duration_ms(&self) -> u32 {
        ((COUNTER_MODULUS as u64 * 1000) / self.tick_rate_hz as u64) as u32
    }
}

/// Mark `pin` as used, rejecting multi-bit masks and reuse.
const fn claim(used: u8, pin: PortPins) -> Result<u8, ConfigError> {
    let bits = pin.bits();
    if bits.count_ones() != 1 {
        return Err(ConfigError::InvalidPin { bits });
    }
    if used & bits != 0 {
        return Err(ConfigError::PinConflict { bits });
    }
    Ok(used | bits)
}

/// Square-wave frequency for a half-period, in 1/100 Hz.
///
/// `tick_rate / (2 * half_period)`; zero for a zero half-period.
pub const fn frequency_centihz(tick_rate_hz: u32, half_period: Ticks) -> u32 {
    if half_period == 0 {
        return 0;
    }
    ((tick_rate_hz as u64 * 100) / (2 * half_period as u64)) as u32
}

/// Nearest half-period for a pitch given in 1/100 Hz.
pub const fn half_period_for(target_centihz: u32, tick_rate_hz: u32) -> Ticks {
    if target_centihz == 0 {
        return 0;
    }
    let full = 2 * target_centihz as u64;
    let half = (tick_rate_hz as u64 * 100 + full / 2) / full;
    if half > Ticks::MAX as u64 {
        Ticks::MAX
    } else {
        half as Ticks
    }
}

/// Active build configuration.
#[cfg(not(feature = "hold-to-play"))]
pub const CONFIG: HornConfig<CHANNELS> = TIMEOUT_HORN;

/// Active build configuration.
#[cfg(feature = "hold-to-play")]
pub const CONFIG: HornConfig<CHANNELS> = HOLD_HORN;

const _: () = match CONFIG.validate() {
    Ok(()) => (),
    Err(_) => panic!("invalid horn configuration"),
};
