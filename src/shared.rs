//! Hand-off of the horn between interrupt handlers and the idle loop.
//!
//! The horn lives in a static `SharedHorn`. Every access runs inside a
//! critical section and gets `&mut` to the whole horn for one bounded step:
//! one handler, or one release poll. Nothing is held across a sleep or
//! across iterations of the release loop.

use core::cell::RefCell;

use critical_section::Mutex;

/// Static cell holding the horn once it has been built.
pub struct SharedHorn<H> {
    inner: Mutex<RefCell<Option<H>>>,
}

impl<H> SharedHorn<H> {
    /// Empty cell, suitable for a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store the horn, returning any previous one.
    pub fn install(&self, horn: H) -> Option<H> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().replace(horn))
    }

    /// Run `f` with exclusive access.
    ///
    /// Returns `None` if no horn is installed yet; interrupts that fire
    /// during board setup land here and are dropped.
    pub fn with<R>(&self, f: impl FnOnce(&mut H) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().as_mut().map(f))
    }
}

impl<H> Default for SharedHorn<H> {
    fn default() -> Self {
        Self::new()
    }
}
