//! Notification delivery for the Tomato Clock.
//!
//! Notifications are a best-effort capability: the engine calls
//! [`Notifier::notify`] at phase transitions and the implementation swallows
//! any delivery failure. When no notifier is configured the engine simply
//! never calls one.

use std::io::Write;
use std::sync::Mutex;

// ============================================================================
// Notifier
// ============================================================================

/// Best-effort notification sink consumed by the timer engine.
///
/// Implementations must never propagate a failure to the caller; log and
/// swallow instead.
pub trait Notifier: Send + Sync {
    /// Delivers a notification. Failures are handled internally.
    fn notify(&self, title: &str, message: &str);
}

// ============================================================================
// ConsoleNotifier
// ============================================================================

/// Prints notifications to the terminal, optionally ringing the bell.
///
/// With `text` disabled this degrades to a pure bell notifier, matching the
/// standalone beep option of the CLI.
#[derive(Debug)]
pub struct ConsoleNotifier {
    text: bool,
    bell: bool,
}

impl ConsoleNotifier {
    /// Creates a console notifier.
    pub fn new(text: bool, bell: bool) -> Self {
        Self { text, bell }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) {
        let mut out = std::io::stdout();
        if self.text {
            // A closed stdout is not worth failing a timer over.
            if writeln!(out, "\n[{}] {}", title, message).is_err() {
                tracing::warn!("failed to write notification to stdout");
                return;
            }
        }
        if self.bell {
            let _ = write!(out, "\x07");
        }
        let _ = out.flush();
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Records notifications instead of delivering them. For tests.
#[derive(Debug, Default)]
pub struct MockNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    /// Creates an empty mock notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications recorded so far as (title, message) pairs.
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns how many notifications were recorded.
    pub fn count(&self) -> usize {
        self.messages().len()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((title.to_string(), message.to_string()));
    }
}

// ============================================================================
// Tests
// ============================================================================
