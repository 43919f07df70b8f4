//! Shared mocks and tick-driven rig for integration tests.

#![allow(dead_code)]

use rust_train_horn::config::{HornConfig, CHANNELS};
use rust_train_horn::logging::LogStream;
use rust_train_horn::{Horn, OutputPort, PlayButton, PortPins, SoftTimer, Transition};

/// Output latch that counts toggles per bit.
#[derive(Debug, Default)]
pub struct MockPort {
    latch: PortPins,
    toggles: [u32; 8],
}

impl MockPort {
    pub fn toggles(&self, pin: PortPins) -> u32 {
        pin.index().map_or(0, |i| self.toggles[i as usize])
    }

    pub fn is_high(&self, pin: PortPins) -> bool {
        self.latch.contains(pin)
    }
}

impl OutputPort for MockPort {
    fn set_low(&mut self, pins: PortPins) {
        self.latch.remove(pins);
    }

    fn set_high(&mut self, pins: PortPins) {
        self.latch.insert(pins);
    }

    fn toggle(&mut self, pins: PortPins) {
        for bit in pins.iter() {
            if let Some(i) = bit.index() {
                self.toggles[i as usize] += 1;
            }
        }
        self.latch.toggle(pins);
    }

    fn output(&self) -> PortPins {
        self.latch
    }
}

/// Active-low button with an edge latch.
#[derive(Debug, Default)]
pub struct MockButton {
    pub pressed: bool,
    pub irq_enabled: bool,
    pub pending: bool,
}

impl MockButton {
    /// Push the button down. Returns `true` if the edge interrupt fires.
    pub fn press(&mut self) -> bool {
        self.pressed = true;
        if self.irq_enabled {
            self.pending = true;
        }
        self.irq_enabled && self.pending
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }
}

impl PlayButton for MockButton {
    fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn enable_interrupt(&mut self) {
        self.irq_enabled = true;
    }

    fn disable_interrupt(&mut self) {
        self.irq_enabled = false;
    }

    fn clear_pending(&mut self) {
        self.pending = false;
    }
}

pub type TestHorn = Horn<SoftTimer<CHANNELS>, MockPort, MockButton, CHANNELS>;

pub const TICK_RATE: u32 = 32_768;

/// Build an armed horn with its own event log, so parallel tests never
/// share a ring.
pub fn make_horn(config: &HornConfig<CHANNELS>) -> TestHorn {
    let log: &'static LogStream = Box::leak(Box::new(LogStream::new()));
    let mut horn = Horn::new(config, SoftTimer::new(), MockPort::default(), MockButton::default())
        .expect("preset config is valid")
        .with_log(log);
    horn.arm_button();
    horn
}

/// Press the button, running the edge handler if the interrupt fires.
pub fn press(horn: &mut TestHorn) -> Option<Transition> {
    if horn.button_mut().press() {
        horn.on_button_interrupt()
    } else {
        None
    }
}

/// Run `ticks` counter clocks and collect the tick number of every toggle
/// of `pin`, counted from the first tick of this call (1-based).
pub fn record_toggles(horn: &mut TestHorn, ticks: u32, pin: PortPins) -> Vec<u32> {
    let mut edges = Vec::new();
    let mut seen = horn.port().toggles(pin);
    for t in 1..=ticks {
        horn.clock_tick();
        let now = horn.port().toggles(pin);
        if now != seen {
            assert_eq!(now, seen + 1, "pin toggled twice in one tick");
            edges.push(t);
            seen = now;
        }
    }
    edges
}

/// Clock until a transition happens, at most `limit` ticks.
///
/// Returns the tick count (1-based) and the transition.
pub fn run_until_transition(horn: &mut TestHorn, limit: u32) -> Option<(u32, Transition)> {
    (1..=limit).find_map(|t| horn.clock_tick().map(|tr| (t, tr)))
}
