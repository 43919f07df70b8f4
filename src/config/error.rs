//! Configuration error types

/// Defect found while validating a horn configuration.
///
/// These are build-time defects. The active configuration is checked in a
/// `const` item, so a firmware image carrying one of these never links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: No tone channel configured
    NoChannels,
    /// C02: Counter tick rate is zero
    ZeroTickRate,
    /// C03: Channel half-period is zero
    ZeroHalfPeriod { channel: usize },
    /// C04: Channel half-period is below the interrupt latency budget
    HalfPeriodTooShort { channel: usize },
    /// C05: Pin mask does not name exactly one bit
    InvalidPin { bits: u8 },
    /// C06: Pin assigned to more than one role
    PinConflict { bits: u8 },
    /// C07: Timer has fewer compare registers than channels
    NotEnoughCompareSlots { needed: usize, available: usize },
}

impl ConfigError {
    /// Get error code string
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoChannels => "C01",
            Self::ZeroTickRate => "C02",
            Self::ZeroHalfPeriod { .. } => "C03",
            Self::HalfPeriodTooShort { .. } => "C04",
            Self::InvalidPin { .. } => "C05",
            Self::PinConflict { .. } => "C06",
            Self::NotEnoughCompareSlots { .. } => "C07",
        }
    }

    /// Get error message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NoChannels => "no tone channels",
            Self::ZeroTickRate => "tick rate is zero",
            Self::ZeroHalfPeriod { .. } => "half-period is zero",
            Self::HalfPeriodTooShort { .. } => "half-period below latency budget",
            Self::InvalidPin { .. } => "pin must be a single bit",
            Self::PinConflict { .. } => "pin used twice",
            Self::NotEnoughCompareSlots { .. } => "not enough compare registers",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())?;
        match self {
            Self::ZeroHalfPeriod { channel } | Self::HalfPeriodTooShort { channel } => {
                write!(f, " (channel {})", channel)
            }
            Self::InvalidPin { bits } | Self::PinConflict { bits } => {
                write!(f, " (mask {:#04x})", bits)
            }
            Self::NotEnoughCompareSlots { needed, available } => {
                write!(f, " ({} needed, {} available)", needed, available)
            }
            Self::NoChannels | Self::ZeroTickRate => Ok(()),
        }
    }
}
