//! Shipped horn builds.
//!
//! Pins are logical port bits; the board layer maps them to real GPIOs.
//!
//! ```text
//!              TIMEOUT_HORN          HOLD_HORN
//! BIT0  -->    status LED            status LED
//! BIT1  <--    play button
//! BIT2  -->                          amp enable
//! BIT3  <--                          play button
//! BIT5  -->    ~248.24 Hz (B3)       ~256.00 Hz (~C4)
//! BIT6  -->    ~309.13 Hz (D#4)      ~309.13 Hz (D#4)
//! BIT7  -->    ~442.81 Hz (A4)       ~442.81 Hz (A4)
//! ```

use super::{ChannelConfig, HornConfig, CHANNELS, TICK_RATE_HZ};
use crate::hal::gpio::PortPins;
use crate::playback::ActivationPolicy;

const D_SHARP_4: ChannelConfig = ChannelConfig {
    name: "D#4",
    half_period_ticks: 53,
    pin: PortPins::BIT6,
    target_centihz: 31_113,
};

const A_4: ChannelConfig = ChannelConfig {
    name: "A4",
    half_period_ticks: 37,
    pin: PortPins::BIT7,
    target_centihz: 44_000,
};

/// Press once, sound for one full counter wrap (2 s at 32.768 kHz).
pub const TIMEOUT_HORN: HornConfig<CHANNELS> = HornConfig {
    tick_rate_hz: TICK_RATE_HZ,
    channels: [
        ChannelConfig {
            name: "B3",
            half_period_ticks: 66,
            pin: PortPins::BIT5,
            target_centihz: 24_694,
        },
        D_SHARP_4,
        A_4,
    ],
    status_led: PortPins::BIT0,
    button: PortPins::BIT1,
    amp_enable: None,
    policy: ActivationPolicy::Timeout,
};

/// Sound for as long as the button is held, with a switched amplifier.
pub const HOLD_HORN: HornConfig<CHANNELS> = HornConfig {
    tick_rate_hz: TICK_RATE_HZ,
    channels: [
        ChannelConfig {
            name: "C4",
            half_period_ticks: 64,
            pin: PortPins::BIT5,
            target_centihz: 25_500,
        },
        D_SHARP_4,
        A_4,
    ],
    status_led: PortPins::BIT0,
    button: PortPins::BIT3,
    amp_enable: Some(PortPins::BIT2),
    policy: ActivationPolicy::HoldToPlay,
};

const _: () = assert!(TIMEOUT_HORN.validate().is_ok());
const _: () = assert!(HOLD_HORN.validate().is_ok());
const _: () = assert!(TIMEOUT_HORN.is_tuned());
const _: () = assert!(HOLD_HORN.is_tuned());
