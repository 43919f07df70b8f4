//! Hardware Abstraction Layer for RustTrainHorn.
//!
//! Traits for the shared timer, the GPIO port and the sleep primitive.
//! Horn logic stays in core modules, HAL is just I/O.

pub mod gpio;
pub mod power;
pub mod soft_timer;
pub mod timer;

pub use gpio::{OutputPort, PlayButton, PortPins};
pub use power::LowPowerSleep;
pub use soft_timer::SoftTimer;
pub use timer::{CompareTimer, Ticks, TimerEvent, COUNTER_MODULUS};
