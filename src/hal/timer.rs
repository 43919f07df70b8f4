//! Shared compare timer interface.
//!
//! One free-running 16-bit counter with several compare registers and an
//! overflow flag, all reported through a single interrupt vector.

/// Counter value. The counter wraps at [`COUNTER_MODULUS`].
pub type Ticks = u16;

/// Number of distinct counter values (one full wrap).
pub const COUNTER_MODULUS: u32 = 1 << Ticks::BITS;

/// Cause read from the shared timer interrupt vector.
///
/// Reading the vector acknowledges the reported source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Vector entered without a pending source.
    None,
    /// Counter reached compare register `slot`.
    Compare(usize),
    /// Counter wrapped from its maximum to zero.
    Overflow,
}

/// Register-level access to the shared counter.
pub trait CompareTimer {
    /// Number of compare registers.
    fn slots(&self) -> usize;

    /// Current counter value.
    fn count(&self) -> Ticks;

    /// Reset the counter to zero.
    fn clear(&mut self);

    /// Start counting.
    fn run(&mut self);

    /// Stop counting. The count is kept.
    fn halt(&mut self);

    fn is_running(&self) -> bool;

    /// Program compare register `slot`.
    fn set_compare(&mut self, slot: usize, value: Ticks);

    fn compare(&self, slot: usize) -> Ticks;

    /// Enable or mask the compare interrupt of `slot`.
    fn enable_compare_interrupt(&mut self, slot: usize, enable: bool);

    /// Enable or mask the overflow interrupt.
    fn enable_overflow_interrupt(&mut self, enable: bool);

    /// Read and acknowledge the highest-priority pending source.
    fn take_event(&mut self) -> TimerEvent;
}
