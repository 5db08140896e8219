// veilog-core/src/logger.rs
//! A redacting `log::Log` wrapper.
//!
//! `RedactLog` sits between call sites and any concrete logging backend:
//! it formats the record's arguments, redacts the resulting message, and
//! forwards a rebuilt record that preserves the original call-site
//! metadata (level, target, module path, file, line). Enabled-level
//! decisions are delegated to the inner logger, so filtering behaves
//! exactly as it would without the wrapper.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::engine::RedactionEngine;

pub struct RedactLog {
    inner: Box<dyn Log>,
    engine: Arc<RedactionEngine>,
}

impl RedactLog {
    pub fn new(inner: Box<dyn Log>, engine: Arc<RedactionEngine>) -> Self {
        Self { inner, engine }
    }

    /// Installs this wrapper as the process-wide logger.
    pub fn install(self, max_level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_max_level(max_level);
        log::set_boxed_logger(Box::new(self))
    }
}

impl Log for RedactLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = self.engine.redact(&record.args().to_string());
        self.inner.log(
            &Record::builder()
                .args(format_args!("{}", message))
                .level(record.level())
                .target(record.target())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use log::Level;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Captured {
        lines: Mutex<Vec<(Level, String, Option<u32>)>>,
    }

    struct CapturingLog(Arc<Captured>);

    impl Log for CapturingLog {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }
        fn log(&self, record: &Record<'_>) {
            self.0.lines.lock().unwrap().push((
                record.level(),
                record.args().to_string(),
                record.line(),
            ));
        }
        fn flush(&self) {}
    }

    fn wrapper_with_sink() -> (RedactLog, Arc<Captured>) {
        let sink = Arc::new(Captured::default());
        let engine = Arc::new(RedactionEngine::new(FieldConfig::default_config()).unwrap());
        (
            RedactLog::new(Box::new(CapturingLog(Arc::clone(&sink))), engine),
            sink,
        )
    }

    #[test]
    fn records_are_redacted_before_forwarding() {
        let (wrapper, sink) = wrapper_with_sink();
        wrapper.log(
            &Record::builder()
                .args(format_args!("sms sent, mobile:13979923451,status:OK"))
                .level(Level::Info)
                .target("notifier")
                .line(Some(42))
                .build(),
        );

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let (level, message, line) = &lines[0];
        assert_eq!(*level, Level::Info);
        assert!(!message.contains("13979923451"), "leaked: {message}");
        assert!(message.starts_with("sms sent, mobile:"));
        assert!(message.ends_with(",status:OK"));
        // Call-site metadata survives the rebuild.
        assert_eq!(*line, Some(42));
    }

    #[test]
    fn clean_records_pass_through_unchanged() {
        let (wrapper, sink) = wrapper_with_sink();
        wrapper.log(
            &Record::builder()
                .args(format_args!("nothing sensitive here"))
                .level(Level::Warn)
                .build(),
        );
        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines[0].1, "nothing sensitive here");
    }
}
