//! Software model of a free-running compare timer.
//!
//! Behaves like a 16-bit continuous-mode timer with `N` capture/compare
//! registers: every [`SoftTimer::tick`] advances the counter by one while
//! running, latches a compare flag when the counter lands on a compare
//! value, and latches the overflow flag when it wraps to zero. Flags only
//! latch while their interrupt is enabled, and masking an interrupt drops its
//! pending flag.
//!
//! [`CompareTimer::take_event`] reads the flags like an interrupt-vector
//! register: compare slots in ascending order first, overflow last.
//!
//! On the host this drives every timing test. On hardware it is clocked from
//! a periodic alarm at the tick rate.

use super::timer::{CompareTimer, Ticks, TimerEvent};

#[derive(Debug, Clone, Copy, Default)]
struct CompareUnit {
    value: Ticks,
    irq_enabled: bool,
    flag: bool,
}

/// Simulated counter with `N` compare registers.
#[derive(Debug, Clone)]
pub struct SoftTimer<const N: usize> {
    count: Ticks,
    running: bool,
    units: [CompareUnit; N],
    overflow_irq_enabled: bool,
    overflow_flag: bool,
}

impl<const N: usize> SoftTimer<N> {
    /// Create a halted timer at zero with all interrupts masked.
    pub const fn new() -> Self {
        Self {
            count: 0,
            running: false,
            units: [CompareUnit {
                value: 0,
                irq_enabled: false,
                flag: false,
            }; N],
            overflow_irq_enabled: false,
            overflow_flag: false,
        }
    }

    /// Advance one counter clock.
    ///
    /// Returns `true` if an enabled interrupt source is pending afterwards.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.count = self.count.wrapping_add(1);

            for unit in self.units.iter_mut() {
                if unit.irq_enabled && unit.value == self.count {
                    unit.flag = true;
                }
            }

            if self.count == 0 && self.overflow_irq_enabled {
                self.overflow_flag = true;
            }
        }

        self.is_pending()
    }

    /// An enabled interrupt source is latched.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.overflow_flag || self.units.iter().any(|u| u.flag)
    }

    /// Compare interrupt of `slot` is enabled.
    pub fn compare_interrupt_enabled(&self, slot: usize) -> bool {
        self.units.get(slot).map_or(false, |u| u.irq_enabled)
    }

    pub fn overflow_interrupt_enabled(&self) -> bool {
        self.overflow_irq_enabled
    }
}

impl<const N: usize> Default for SoftTimer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CompareTimer for SoftTimer<N> {
    fn slots(&self) -> usize {
        N
    }

    #[inline]
    fn count(&self) -> Ticks {
        self.count
    }

    fn clear(&mut self) {
        self.count = 0;
    }

    fn run(&mut self) {
        self.running = true;
    }

    fn halt(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    fn set_compare(&mut self, slot: usize, value: Ticks) {
        if let Some(unit) = self.units.get_mut(slot) {
            unit.value = value;
        }
    }

    fn compare(&self, slot: usize) -> Ticks {
        self.units.get(slot).map_or(0, |u| u.value)
    }

    fn enable_compare_interrupt(&mut self, slot: usize, enable: bool) {
        if let Some(unit) = self.units.get_mut(slot) {
            unit.irq_enabled = enable;
            if !enable {
                unit.flag = false;
            }
        }
    }

    fn enable_overflow_interrupt(&mut self, enable: bool) {
        self.overflow_irq_enabled = enable;
        if !enable {
            self.overflow_flag = false;
        }
    }

    #[inline]
    fn take_event(&mut self) -> TimerEvent {
        if let Some(slot) = self.units.iter().position(|u| u.flag) {
            self.units[slot].flag = false;
            return TimerEvent::Compare(slot);
        }

        if self.overflow_flag {
            self.overflow_flag = false;
            return TimerEvent::Overflow;
        }

        TimerEvent::None
    }
}
