//! Capabilities the host lends to a loaded module.
//!
//! The guest sees three callbacks: resize the heap, report a stack overflow,
//! and log a record. They live on one trait so a single implementation can be
//! handed to the bridge instead of scattering free-floating state.

use tracing::{debug, error, info, warn};

/// Severity carried on the guest's logging calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Maps the guest's raw level to a severity. Unknown values land on debug.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

/// Host capabilities a running module may call back into.
pub trait HostHooks: Send + Sync {
    /// Guest asked for more linear memory. The return value follows the
    /// emscripten convention; the default refuses growth.
    fn resize_heap(&self, _requested_bytes: u32) -> i32 {
        0
    }

    /// Guest detected a stack overflow.
    fn stack_overflow(&self);

    /// One guest log record, already decoded to text.
    fn log(&self, level: LogLevel, message: &str);
}

/// Default hooks that forward guest records to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl HostHooks for TracingHooks {
    fn stack_overflow(&self) {
        warn!(target: "guest", "stack overflow reported by module");
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "guest", "{message}"),
            LogLevel::Warn => warn!(target: "guest", "{message}"),
            LogLevel::Info => info!(target: "guest", "{message}"),
            LogLevel::Debug => debug!(target: "guest", "{message}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::{HostHooks, LogLevel};
    use std::sync::Mutex;

    /// Captures every callback for assertions.
    #[derive(Default)]
    pub struct RecordingHooks {
        pub records: Mutex<Vec<(LogLevel, String)>>,
        pub overflows: Mutex<usize>,
        pub resize_requests: Mutex<Vec<u32>>,
    }

    impl HostHooks for RecordingHooks {
        fn resize_heap(&self, requested: u32) -> i32 {
            self.resize_requests.lock().unwrap().push(requested);
            0
        }

        fn stack_overflow(&self) {
            *self.overflows.lock().unwrap() += 1;
        }

        fn log(&self, level: LogLevel, message: &str) {
            self.records
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::RecordingHooks;
    use super::*;

    #[test]
    fn raw_levels_map_to_severities() {
        assert_eq!(LogLevel::from_raw(0), LogLevel::Error);
        assert_eq!(LogLevel::from_raw(1), LogLevel::Warn);
        assert_eq!(LogLevel::from_raw(2), LogLevel::Info);
        assert_eq!(LogLevel::from_raw(3), LogLevel::Debug);
        assert_eq!(LogLevel::from_raw(99), LogLevel::Debug);
        assert_eq!(LogLevel::from_raw(-1), LogLevel::Debug);
    }

    #[test]
    fn default_resize_refuses_growth() {
        struct Quiet;
        impl HostHooks for Quiet {
            fn stack_overflow(&self) {}
            fn log(&self, _: LogLevel, _: &str) {}
        }

        assert_eq!(Quiet.resize_heap(1 << 20), 0);
    }

    #[test]
    fn recording_hooks_capture_calls_in_order() {
        let hooks = RecordingHooks::default();
        hooks.log(LogLevel::Error, "first");
        hooks.log(LogLevel::Info, "second");
        hooks.stack_overflow();

        let records = hooks.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (LogLevel::Error, "first".to_string()));
        assert_eq!(records[1], (LogLevel::Info, "second".to_string()));
        assert_eq!(*hooks.overflows.lock().unwrap(), 1);
    }
}
