//! Forwarding of interrupt-side log entries to the `log` facade.
//!
//! Runs in the idle loop, where blocking output is fine. On hardware the
//! facade is backed by the ESP-IDF console logger.

use crate::logging::LogStream;

/// Forward every queued entry to the `log` facade.
///
/// Reports and resets the drop counter if entries were lost since the last
/// call. Returns the number of entries forwarded.
pub fn forward_to_log<const N: usize>(stream: &LogStream<N>) -> usize {
    let mut forwarded = 0;

    while let Some(entry) = stream.drain() {
        log::log!(
            target: "horn",
            entry.level.to_log(),
            "[{:>5}] {}",
            entry.ticks,
            entry.message()
        );
        forwarded += 1;
    }

    let dropped = stream.take_dropped();
    if dropped > 0 {
        log::warn!(target: "horn", "{} log entries dropped", dropped);
    }

    forwarded
}
