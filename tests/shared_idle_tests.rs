//! The board wiring on the host: horn in a static, idle loop driving it

mod common;

use common::{make_horn, MockButton, MockPort, TestHorn};
use rust_train_horn::config::{HOLD_HORN, TIMEOUT_HORN};
use rust_train_horn::hal::{LowPowerSleep, COUNTER_MODULUS};
use rust_train_horn::idle::idle_pass;
use rust_train_horn::{
    ActivationPolicy, Horn, PlaybackState, ReleasePoll, SharedHorn, SoftTimer, Transition,
};

/// "Sleep" that wakes on a button press, running the edge handler.
struct PressOnWake<'a> {
    horn: &'a SharedHorn<TestHorn>,
    started: Option<Transition>,
}

impl LowPowerSleep for PressOnWake<'_> {
    fn sleep_until_interrupt(&mut self) {
        self.started = self
            .horn
            .with(|h| {
                if h.button_mut().press() {
                    h.on_button_interrupt()
                } else {
                    None
                }
            })
            .flatten();
    }
}

fn poll(horn: &SharedHorn<TestHorn>) -> ReleasePoll {
    horn.with(|h| h.poll_release())
        .unwrap_or(ReleasePoll::Inactive)
}

#[test]
fn test_handlers_before_install_are_dropped() {
    static HORN: SharedHorn<TestHorn> = SharedHorn::new();

    assert_eq!(HORN.with(|h| h.clock_tick()), None);
    assert_eq!(poll(&HORN), ReleasePoll::Inactive);
}

#[test]
fn test_button_masked_until_armed_after_install() {
    static HORN: SharedHorn<TestHorn> = SharedHorn::new();

    let stale = MockButton {
        pending: true,
        ..MockButton::default()
    };
    let horn = Horn::new(&TIMEOUT_HORN, SoftTimer::new(), MockPort::default(), stale)
        .expect("preset config is valid");
    assert!(!horn.button().irq_enabled);
    assert!(!horn.button().pending);
    HORN.install(horn);

    // An edge before arming does not latch, so nothing is lost.
    assert_eq!(HORN.with(|h| h.button_mut().press()), Some(false));
    HORN.with(|h| h.button_mut().release());

    HORN.with(|h| h.arm_button());
    assert_eq!(HORN.with(|h| h.button().irq_enabled), Some(true));

    let started = HORN
        .with(|h| {
            if h.button_mut().press() {
                h.on_button_interrupt()
            } else {
                None
            }
        })
        .flatten();
    assert_eq!(started, Some(Transition::Started));

    // Arming again mid-play must not unmask the button.
    HORN.with(|h| h.arm_button());
    assert_eq!(HORN.with(|h| h.button().irq_enabled), Some(false));
}

#[test]
fn test_hold_idle_pass_waits_for_release() {
    static HORN: SharedHorn<TestHorn> = SharedHorn::new();
    HORN.install(make_horn(&HOLD_HORN));

    let hold = 2_000u32;
    let mut clocked = 0u32;
    let mut sleep = PressOnWake {
        horn: &HORN,
        started: None,
    };

    // Each spin stands in for one tick of wall time.
    let held = idle_pass(
        &mut sleep,
        ActivationPolicy::HoldToPlay,
        || poll(&HORN),
        || {
            HORN.with(|h| {
                h.clock_tick();
                clocked += 1;
                if clocked == hold {
                    h.button_mut().release();
                }
            });
        },
    );

    assert_eq!(sleep.started, Some(Transition::Started));
    assert_eq!(held, hold);
    assert_eq!(HORN.with(|h| h.state()), Some(PlaybackState::Idle));
}

#[test]
fn test_timeout_idle_pass_returns_after_wake() {
    static HORN: SharedHorn<TestHorn> = SharedHorn::new();
    HORN.install(make_horn(&TIMEOUT_HORN));

    let mut sleep = PressOnWake {
        horn: &HORN,
        started: None,
    };
    let held = idle_pass(&mut sleep, ActivationPolicy::Timeout, || poll(&HORN), || {});

    assert_eq!(sleep.started, Some(Transition::Started));
    assert_eq!(held, 0);
    assert_eq!(HORN.with(|h| h.is_playing()), Some(true));

    // The timer interrupt finishes the play with the idle loop asleep.
    let stop = (1..=COUNTER_MODULUS).find_map(|_| HORN.with(|h| h.clock_tick()).flatten());
    assert!(stop.is_some());
    assert_eq!(HORN.with(|h| h.is_playing()), Some(false));
}

#[test]
fn test_repeated_idle_passes() {
    static HORN: SharedHorn<TestHorn> = SharedHorn::new();
    HORN.install(make_horn(&HOLD_HORN));

    for round in 1..=3u32 {
        let mut sleep = PressOnWake {
            horn: &HORN,
            started: None,
        };
        let mut clocked = 0u32;
        let held = idle_pass(
            &mut sleep,
            ActivationPolicy::HoldToPlay,
            || poll(&HORN),
            || {
                HORN.with(|h| {
                    h.clock_tick();
                    clocked += 1;
                    if clocked == 100 * round {
                        h.button_mut().release();
                    }
                });
            },
        );
        assert_eq!(held, 100 * round);
    }

    assert_eq!(HORN.with(|h| h.stats().plays), Some(3));
}
