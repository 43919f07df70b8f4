//! Idle loop: sleep between interactions, poll for release while holding.
//!
//! The loop sleeps until an interrupt. Under the hold-to-play policy it then
//! busy-polls the button until it reads released. There is no scheduler to
//! yield to, and nothing else to do while the horn sounds.

use crate::hal::power::LowPowerSleep;
use crate::playback::ActivationPolicy;

/// Result of one release poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePoll {
    /// Still playing, button still down.
    Held,
    /// Button was up; playback stopped by this poll.
    Released,
    /// Nothing to wait for (idle, or the policy does not stop on release).
    Inactive,
}

/// Busy-wait until `poll` stops reporting [`ReleasePoll::Held`].
///
/// Each iteration is one `poll` plus one `spin`, so a release is seen at most
/// one iteration after it happens. The total wait is as long as the button is
/// held. Returns the number of `Held` polls.
pub fn wait_for_release<F, S>(mut poll: F, mut spin: S) -> u32
where
    F: FnMut() -> ReleasePoll,
    S: FnMut(),
{
    let mut held = 0u32;
    while poll() == ReleasePoll::Held {
        held = held.saturating_add(1);
        spin();
    }
    held
}

/// One pass of the idle loop.
///
/// Sleeps, then waits out a hold-to-play press. Returns the number of
/// `Held` polls (always zero under the timeout policy).
pub fn idle_pass<Z, F, S>(sleep: &mut Z, policy: ActivationPolicy, poll: F, spin: S) -> u32
where
    Z: LowPowerSleep,
    F: FnMut() -> ReleasePoll,
    S: FnMut(),
{
    sleep.sleep_until_interrupt();

    if policy.stops_on_release() {
        wait_for_release(poll, spin)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSleep(u32);

    impl LowPowerSleep for CountingSleep {
        fn sleep_until_interrupt(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_wait_counts_held_polls() {
        let mut remaining = 3;
        let mut spins = 0;
        let held = wait_for_release(
            || {
                if remaining == 0 {
                    ReleasePoll::Released
                } else {
                    remaining -= 1;
                    ReleasePoll::Held
                }
            },
            || spins += 1,
        );

        assert_eq!(held, 3);
        assert_eq!(spins, 3);
    }

    #[test]
    fn test_wait_returns_immediately_when_inactive() {
        assert_eq!(wait_for_release(|| ReleasePoll::Inactive, || {}), 0);
    }

    #[test]
    fn test_timeout_pass_never_polls() {
        let mut sleep = CountingSleep(0);
        let held = idle_pass(
            &mut sleep,
            ActivationPolicy::Timeout,
            || panic!("timeout policy must not poll"),
            || {},
        );

        assert_eq!(held, 0);
        assert_eq!(sleep.0, 1);
    }

    #[test]
    fn test_hold_pass_polls_after_sleep() {
        let mut sleep = CountingSleep(0);
        let mut polls = 0;
        let held = idle_pass(
            &mut sleep,
            ActivationPolicy::HoldToPlay,
            || {
                polls += 1;
                if polls < 5 {
                    ReleasePoll::Held
                } else {
                    ReleasePoll::Released
                }
            },
            || {},
        );

        assert_eq!(held, 4);
        assert_eq!(sleep.0, 1);
    }
}
