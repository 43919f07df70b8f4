//! Timeout policy: press once, sound for one counter wrap

mod common;

use common::{make_horn, press, run_until_transition, MockPort};
use rust_train_horn::config::TIMEOUT_HORN;
use rust_train_horn::hal::COUNTER_MODULUS;
use rust_train_horn::{
    ActivationPolicy, CompareTimer, OutputPort, PlaybackState, PortPins, ReleasePoll, StopReason,
    TimerEvent, Transition,
};

fn tone_pins_low(port: &MockPort) -> bool {
    !port.output().intersects(TIMEOUT_HORN.tone_pins())
}

#[test]
fn test_initial_state() {
    let horn = make_horn(&TIMEOUT_HORN);

    assert_eq!(horn.state(), PlaybackState::Idle);
    assert_eq!(horn.policy(), ActivationPolicy::Timeout);
    assert!(horn.button().irq_enabled);
    assert!(!horn.timer().is_running());
    assert!(tone_pins_low(horn.port()));
    assert!(!horn.port().is_high(TIMEOUT_HORN.status_led));
}

#[test]
fn test_press_starts_playback() {
    let mut horn = make_horn(&TIMEOUT_HORN);

    assert_eq!(press(&mut horn), Some(Transition::Started));

    assert_eq!(horn.state(), PlaybackState::Playing);
    assert!(horn.engine().is_running());
    assert!(horn.engine().is_consistent());
    assert!(horn.timer().is_running());
    assert!(!horn.button().irq_enabled);
    assert!(!horn.button().pending, "edge must be acknowledged before the counter runs");
    assert!(horn.port().is_high(TIMEOUT_HORN.status_led));
    assert_eq!(horn.stats().plays, 1);
}

#[test]
fn test_stops_after_exactly_one_wrap() {
    let mut horn = make_horn(&TIMEOUT_HORN);
    press(&mut horn);

    let (ticks, transition) =
        run_until_transition(&mut horn, 2 * COUNTER_MODULUS).expect("overflow must stop playback");

    assert_eq!(ticks, COUNTER_MODULUS);
    assert_eq!(transition, Transition::Stopped(StopReason::Overflow));
    assert_eq!(horn.state(), PlaybackState::Idle);
}

#[test]
fn test_duration_independent_of_channels() {
    // Same wrap length with a single slow channel and with the full set.
    let mut config = TIMEOUT_HORN;
    config.channels[0].half_period_ticks = 4000;
    config.channels[1].half_period_ticks = 4001;
    config.channels[2].half_period_ticks = 4002;

    let mut horn = make_horn(&config);
    press(&mut horn);

    let (ticks, _) = run_until_transition(&mut horn, 2 * COUNTER_MODULUS).unwrap();
    assert_eq!(ticks, COUNTER_MODULUS);
}

#[test]
fn test_stop_restores_idle_outputs() {
    let mut horn = make_horn(&TIMEOUT_HORN);
    press(&mut horn);
    run_until_transition(&mut horn, 2 * COUNTER_MODULUS).unwrap();

    assert!(tone_pins_low(horn.port()));
    assert!(!horn.port().is_high(TIMEOUT_HORN.status_led));
    assert!(!horn.timer().is_running());
    assert!(horn.engine().is_consistent());
    assert!(horn.button().irq_enabled);
    assert!(!horn.button().pending);
}

#[test]
fn test_second_press_while_playing_is_ignored() {
    let mut horn = make_horn(&TIMEOUT_HORN);
    press(&mut horn);

    for _ in 0..1000 {
        horn.clock_tick();
    }
    let count = horn.timer().count();

    // Interrupt is masked: the edge never reaches the handler.
    horn.button_mut().release();
    assert_eq!(press(&mut horn), None);

    // A stale edge delivered anyway changes nothing.
    assert_eq!(horn.on_button_interrupt(), None);
    assert_eq!(horn.timer().count(), count);
    assert_eq!(horn.stats().plays, 1);
    assert_eq!(horn.state(), PlaybackState::Playing);

    let (ticks, _) = run_until_transition(&mut horn, 2 * COUNTER_MODULUS).unwrap();
    assert_eq!(ticks, COUNTER_MODULUS - 1000);
}

#[test]
fn test_can_replay_after_stop() {
    let mut horn = make_horn(&TIMEOUT_HORN);

    for round in 1..=3 {
        horn.button_mut().release();
        assert_eq!(press(&mut horn), Some(Transition::Started));
        let (ticks, _) = run_until_transition(&mut horn, 2 * COUNTER_MODULUS).unwrap();
        assert_eq!(ticks, COUNTER_MODULUS);
        assert_eq!(horn.stats().plays, round);
    }
}

#[test]
fn test_release_poll_is_inactive() {
    let mut horn = make_horn(&TIMEOUT_HORN);
    press(&mut horn);
    horn.button_mut().release();

    assert_eq!(horn.poll_release(), ReleasePoll::Inactive);
    assert_eq!(horn.state(), PlaybackState::Playing);
}

#[test]
fn test_spurious_vector_is_noop() {
    let mut horn = make_horn(&TIMEOUT_HORN);
    press(&mut horn);
    for _ in 0..100 {
        horn.clock_tick();
    }
    let led = horn.port().output();

    assert_eq!(horn.on_timer_interrupt(), None);
    assert_eq!(horn.dispatch(TimerEvent::None), None);

    assert_eq!(horn.state(), PlaybackState::Playing);
    assert_eq!(horn.port().output(), led);
    assert_eq!(horn.stats().spurious_interrupts, 2);
}

#[test]
fn test_overflow_while_idle_is_noop() {
    let mut horn = make_horn(&TIMEOUT_HORN);

    assert_eq!(horn.dispatch(TimerEvent::Overflow), None);
    assert_eq!(horn.state(), PlaybackState::Idle);
    assert!(horn.button().irq_enabled);
}

#[test]
fn test_led_toggles_on_each_transition() {
    let mut horn = make_horn(&TIMEOUT_HORN);
    let led = PortPins::BIT0;

    press(&mut horn);
    assert_eq!(horn.port().toggles(led), 1);
    run_until_transition(&mut horn, 2 * COUNTER_MODULUS).unwrap();
    assert_eq!(horn.port().toggles(led), 2);
}
