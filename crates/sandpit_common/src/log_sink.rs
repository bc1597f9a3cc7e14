use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
  Info,
  Warn,
  Error,
  Success,
  Debug,
}

/// Leveled diagnostics sink consumed throughout the pipeline.
///
/// The pipeline never opens dialogs or writes to stdout directly; every
/// user-visible failure is a log line through this interface, an in-sandbox
/// explanatory document, or both.
pub trait LogSink: Send + Sync {
  fn log(&self, level: LogLevel, message: &str);

  fn info(&self, message: &str) {
    self.log(LogLevel::Info, message);
  }

  fn warn(&self, message: &str) {
    self.log(LogLevel::Warn, message);
  }

  fn error(&self, message: &str) {
    self.log(LogLevel::Error, message);
  }

  fn success(&self, message: &str) {
    self.log(LogLevel::Success, message);
  }

  fn debug(&self, message: &str) {
    self.log(LogLevel::Debug, message);
  }
}

pub type SharedLogSink = Arc<dyn LogSink>;

/// Default sink: forwards to `tracing`. Success is a presentation variant of
/// info and keeps the info level on the tracing side.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
  fn log(&self, level: LogLevel, message: &str) {
    match level {
      LogLevel::Info | LogLevel::Success => tracing::info!("{message}"),
      LogLevel::Warn => tracing::warn!("{message}"),
      LogLevel::Error => tracing::error!("{message}"),
      LogLevel::Debug => tracing::debug!("{message}"),
    }
  }
}

/// Recording sink for assertions in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
  messages: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
  pub fn messages(&self) -> Vec<(LogLevel, String)> {
    self.messages.lock().expect("sink poisoned").clone()
  }

  pub fn contains(&self, needle: &str) -> bool {
    self.messages().iter().any(|(_, message)| message.contains(needle))
  }
}

impl LogSink for MemorySink {
  fn log(&self, level: LogLevel, message: &str) {
    self.messages.lock().expect("sink poisoned").push((level, message.to_string()));
  }
}
