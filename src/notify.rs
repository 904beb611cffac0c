//! User-visible notices.
//!
//! The transport layer reports request failures here rather than printing
//! directly, so the same pipeline serves the interactive console, plain CLI
//! commands, and tests. The default sink forwards to `tracing`.

use std::sync::Arc;

/// Severity of a notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A single user-visible message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default sink: forward notices to the log stream.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Warning => tracing::warn!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
}

/// Sink that styles notices for the interactive console.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let styled = match notice.level {
            NoticeLevel::Info => console::style(&notice.message).cyan(),
            NoticeLevel::Warning => console::style(&notice.message).yellow(),
            NoticeLevel::Error => console::style(&notice.message).red().bold(),
        };
        eprintln!("{styled}");
    }
}

/// Test sink that records every notice it receives.
#[cfg(test)]
pub struct RecordingNotifier {
    pub notices: parking_lot::Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            notices: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.message.clone()).collect()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Shared notifier handle used across the client.
pub type SharedNotifier = Arc<dyn Notifier>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_levels() {
        assert_eq!(Notice::info("a").level, NoticeLevel::Info);
        assert_eq!(Notice::warning("b").level, NoticeLevel::Warning);
        assert_eq!(Notice::error("c").level, NoticeLevel::Error);
    }

    #[test]
    fn recording_notifier_collects_in_order() {
        let recorder = RecordingNotifier::new();
        recorder.notify(Notice::error("first"));
        recorder.notify(Notice::info("second"));
        assert_eq!(recorder.messages(), vec!["first", "second"]);
    }
}
