//! Global log stream instance.

use crate::logging::LogStream;

/// Event log shared by the horn's interrupt handlers.
///
/// Single producer (whichever handler holds the horn), single consumer
/// (idle loop drain).
pub static EVENT_LOG: LogStream = LogStream::new();
