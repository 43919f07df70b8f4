//! RustTrainHorn - ESP32-S3 entry point
//!
//! Board glue only:
//! 1. Map the logical port bits to GPIOs
//! 2. Clock the software compare timer from a hardware alarm at the tick rate
//! 3. Route the button edge and alarm interrupts into the shared horn
//! 4. Idle loop: block until an interrupt wakes us, drain the event log
//!
//! ```text
//!                ESP32-S3
//!             -------------
//!            |       GPIO7 |--> status LED
//!            |       GPIO0 |<-- play button to GND
//!            |      GPIO15 |--> audio amp enable (hold-to-play build)
//!            |       GPIO4 |--> tone channel 0
//!            |       GPIO5 |--> tone channel 1
//!            |       GPIO6 |--> tone channel 2
//!             -------------
//! ```

use core::num::NonZeroU32;

use esp_idf_svc::hal::delay::{Ets, BLOCK};
use esp_idf_svc::hal::gpio::{
    AnyIOPin, AnyOutputPin, IOPin, Input, InterruptType, Level, Output, OutputPin, PinDriver, Pull,
};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::task::notification::Notification;
use esp_idf_svc::hal::timer::{config::Config as TimerConfig, TimerDriver};
use esp_idf_svc::sys::EspError;

use rust_train_horn::config::{ConfigError, CHANNELS, CONFIG};
use rust_train_horn::hal::{LowPowerSleep, OutputPort, PlayButton, PortPins, SoftTimer};
use rust_train_horn::{idle, log_drain, Horn, ReleasePoll, SharedHorn, EVENT_LOG};

/// Busy-wait between two release polls.
const RELEASE_POLL_INTERVAL_US: u32 = 100;

/// Timer divider: 80 MHz APB / 2 = 40 MHz alarm resolution.
const TIMER_DIVIDER: u32 = 2;

type BoardHorn = Horn<SoftTimer<CHANNELS>, BoardPort, BoardButton, CHANNELS>;

static HORN: SharedHorn<BoardHorn> = SharedHorn::new();

/// Board bring-up failure.
#[derive(Debug)]
enum SetupError {
    Esp(EspError),
    Config(ConfigError),
}

impl From<EspError> for SetupError {
    fn from(e: EspError) -> Self {
        Self::Esp(e)
    }
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Esp(e) => write!(f, "ESP-IDF: {}", e),
            Self::Config(e) => write!(f, "config: {}", e),
        }
    }
}

/// Logical port backed by individual GPIO drivers.
struct BoardPort {
    drivers: [Option<PinDriver<'static, AnyOutputPin, Output>>; 8],
    latch: PortPins,
}

impl BoardPort {
    fn new() -> Self {
        Self {
            drivers: Default::default(),
            latch: PortPins::empty(),
        }
    }

    /// Back logical bit `bit` with `pin`, driven low.
    fn attach(&mut self, bit: PortPins, pin: AnyOutputPin) -> Result<(), EspError> {
        let mut driver = PinDriver::output(pin)?;
        driver.set_low()?;
        if let Some(idx) = bit.index() {
            self.drivers[idx as usize] = Some(driver);
        }
        Ok(())
    }

    fn write(&mut self, pins: PortPins) {
        for bit in pins.iter() {
            let level = Level::from(self.latch.contains(bit));
            if let Some(driver) = bit.index().and_then(|i| self.drivers[i as usize].as_mut()) {
                // Runs in interrupt context; a failed write only costs one edge.
                let _ = driver.set_level(level);
            }
        }
    }
}

impl OutputPort for BoardPort {
    fn set_low(&mut self, pins: PortPins) {
        self.latch.remove(pins);
        self.write(pins);
    }

    fn set_high(&mut self, pins: PortPins) {
        self.latch.insert(pins);
        self.write(pins);
    }

    fn toggle(&mut self, pins: PortPins) {
        self.latch.toggle(pins);
        self.write(pins);
    }

    fn output(&self) -> PortPins {
        self.latch
    }
}

/// Active-low button with a falling-edge interrupt.
struct BoardButton {
    pin: PinDriver<'static, AnyIOPin, Input>,
}

impl PlayButton for BoardButton {
    fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }

    fn enable_interrupt(&mut self) {
        let _ = self.pin.enable_interrupt();
    }

    fn disable_interrupt(&mut self) {
        let _ = self.pin.disable_interrupt();
    }

    fn clear_pending(&mut self) {
        // The GPIO ISR service acknowledges the edge before our callback runs.
    }
}

/// Block the main task until an interrupt handler notifies it.
struct TaskSleep(Notification);

impl LowPowerSleep for TaskSleep {
    fn sleep_until_interrupt(&mut self) {
        let _ = self.0.wait(BLOCK);
    }
}

fn main() -> Result<(), SetupError> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("{} ({})", env!("VERSION_STRING"), CONFIG.policy.as_str());
    for channel in CONFIG.channels.iter() {
        let centihz = channel.achieved_centihz(CONFIG.tick_rate_hz);
        log::info!(
            "{}: {} ticks -> {}.{:02} Hz",
            channel.name,
            channel.half_period_ticks,
            centihz / 100,
            centihz % 100
        );
    }

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let mut port = BoardPort::new();
    port.attach(CONFIG.channels[0].pin, pins.gpio4.downgrade_output())?;
    port.attach(CONFIG.channels[1].pin, pins.gpio5.downgrade_output())?;
    port.attach(CONFIG.channels[2].pin, pins.gpio6.downgrade_output())?;
    port.attach(CONFIG.status_led, pins.gpio7.downgrade_output())?;
    if let Some(amp) = CONFIG.amp_enable {
        port.attach(amp, pins.gpio15.downgrade_output())?;
    }

    let notification = Notification::new();

    let mut button = PinDriver::input(pins.gpio0.downgrade())?;
    button.set_pull(Pull::Up)?;
    button.set_interrupt_type(InterruptType::NegEdge)?;
    let wake = notification.notifier();
    // SAFETY: The callback only touches HORN inside a critical section and
    // the task notifier, both ISR-safe.
    unsafe {
        button.subscribe(move || {
            if HORN.with(|h| h.on_button_interrupt()).flatten().is_some() {
                wake.notify_and_yield(NonZeroU32::MIN);
            }
        })?;
    }

    let horn = Horn::new(&CONFIG, SoftTimer::new(), port, BoardButton { pin: button })?;
    HORN.install(horn);
    // The GPIO driver masks the edge interrupt after each trigger, so it is
    // only unmasked once the callback can reach the horn.
    HORN.with(|h| h.arm_button());

    let mut timer = TimerDriver::new(
        peripherals.timer00,
        &TimerConfig::new().divider(TIMER_DIVIDER).auto_reload(true),
    )?;
    timer.set_alarm(timer.tick_hz() / u64::from(CONFIG.tick_rate_hz))?;
    let wake = notification.notifier();
    // SAFETY: Same as the button callback.
    unsafe {
        timer.subscribe(move || {
            if HORN.with(|h| h.clock_tick()).flatten().is_some() {
                wake.notify_and_yield(NonZeroU32::MIN);
            }
        })?;
    }
    timer.enable_interrupt()?;
    timer.enable_alarm(true)?;
    timer.enable(true)?;

    log::info!("ready");

    let mut sleep = TaskSleep(notification);
    loop {
        idle::idle_pass(
            &mut sleep,
            CONFIG.policy,
            || HORN.with(|h| h.poll_release()).unwrap_or(ReleasePoll::Inactive),
            || Ets::delay_us(RELEASE_POLL_INTERVAL_US),
        );
        log_drain::forward_to_log(&EVENT_LOG);
    }
}
