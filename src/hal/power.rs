//! Low-power sleep primitive.

/// Sleep until any enabled interrupt fires.
///
/// Implementations return after the waking interrupt handler has run.
pub trait LowPowerSleep {
    fn sleep_until_interrupt(&mut self);
}
