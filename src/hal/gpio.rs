//! GPIO interfaces for tone outputs, status LED and play button.
//!
//! Pin direction, pull-ups and pin-function selection are done once by the
//! board setup code; these traits only cover what the horn does at runtime.

use bitflags::bitflags;

bitflags! {
    /// Logical bits of the horn's output/input port.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PortPins: u8 {
        const BIT0 = 1 << 0;
        const BIT1 = 1 << 1;
        const BIT2 = 1 << 2;
        const BIT3 = 1 << 3;
        const BIT4 = 1 << 4;
        const BIT5 = 1 << 5;
        const BIT6 = 1 << 6;
        const BIT7 = 1 << 7;
    }
}

impl Default for PortPins {
    /// No bits set.
    fn default() -> Self {
        Self::empty()
    }
}

impl PortPins {
    /// Index of the lowest set bit, if any.
    #[inline]
    pub const fn index(self) -> Option<u8> {
        if self.bits() == 0 {
            None
        } else {
            Some(self.bits().trailing_zeros() as u8)
        }
    }
}

/// Output side of the port.
///
/// Every method changes all bits in `pins` together.
pub trait OutputPort {
    /// Drive the given bits low.
    fn set_low(&mut self, pins: PortPins);

    /// Drive the given bits high.
    fn set_high(&mut self, pins: PortPins);

    /// Invert the given bits.
    fn toggle(&mut self, pins: PortPins);

    /// Current output latch.
    fn output(&self) -> PortPins;
}

/// Active-low play button with a falling-edge interrupt.
pub trait PlayButton {
    /// Pin level says the button is held down.
    fn is_pressed(&self) -> bool;

    /// Allow the edge interrupt to fire.
    fn enable_interrupt(&mut self);

    /// Mask the edge interrupt.
    fn disable_interrupt(&mut self);

    /// Acknowledge a latched edge.
    fn clear_pending(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert_eq!(PortPins::default(), PortPins::empty());
        assert_eq!(PortPins::default().index(), None);
    }

    #[test]
    fn test_index_of_lowest_bit() {
        assert_eq!(PortPins::BIT0.index(), Some(0));
        assert_eq!(PortPins::BIT7.index(), Some(7));
        assert_eq!((PortPins::BIT3 | PortPins::BIT6).index(), Some(3));
    }
}
