use std::{fmt::Display, sync::Mutex};

use anyhow::anyhow;

/// A sink for human-readable analysis messages.
///
/// Loggers are passed explicitly through the analysis entrypoints rather than
/// installed globally, so two analyses running in the same process can report
/// to different places.
pub trait Logger: Clone {
    fn log(&self, message: impl Display);
    fn warn(&self, message: impl Display) {
        self.log(format!("WARN: {}", message));
    }
    fn error(&self, message: impl Display) {
        self.log(format!("ERROR: {}", message));
    }
}

impl<T: Logger> Logger for &T {
    fn log(&self, message: impl Display) {
        (*self).log(message);
    }
    fn warn(&self, message: impl Display) {
        (*self).warn(message);
    }
    fn error(&self, message: impl Display) {
        (*self).error(message);
    }
}

/// Collects messages in memory.
///
/// Used by tests, and by per-file tasks that buffer their diagnostics so the
/// caller can replay them in a stable order.
pub struct VecLogger {
    logs: Mutex<Vec<String>>,
}

impl Logger for &VecLogger {
    fn log(&self, message: impl Display) {
        let mut logs = match self.logs.lock() {
            Ok(logs) => logs,
            Err(poisoned) => poisoned.into_inner(),
        };
        logs.push(format!("{}", message));
    }
}
impl VecLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn get_logs(self) -> Result<Vec<String>, anyhow::Error> {
        self.logs
            .into_inner()
            .map_err(|err| anyhow!("error unlocking VecLogger logs:{err}"))
    }

    /// Copies the messages collected so far without consuming the logger
    pub fn snapshot(&self) -> Vec<String> {
        match self.logs.lock() {
            Ok(logs) => logs.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
impl Default for VecLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards messages to the `tracing` subscriber installed by the host
/// process, mapping log / warn / error onto the matching levels.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: impl Display) {
        tracing::info!("{}", message);
    }
    fn warn(&self, message: impl Display) {
        tracing::warn!("{}", message);
    }
    fn error(&self, message: impl Display) {
        tracing::error!("{}", message);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Logger, VecLogger};

    #[test]
    fn test_vec_logger_prefixes_levels() {
        let logger = VecLogger::new();
        (&logger).log("scanned 3 files");
        (&logger).warn("skipped <Route> without a target");
        (&logger).error("could not parse src/Broken.tsx");

        assert_eq!(
            logger.get_logs().unwrap(),
            vec![
                "scanned 3 files".to_string(),
                "WARN: skipped <Route> without a target".to_string(),
                "ERROR: could not parse src/Broken.tsx".to_string(),
            ]
        );
    }

    #[test]
    fn test_logging_through_double_reference() {
        let logger = VecLogger::new();
        let by_ref = &logger;
        let forwarded = &by_ref;
        forwarded.warn("nested");

        assert_eq!(logger.snapshot(), vec!["WARN: nested".to_string()]);
    }
}
