//! Status messages for the operator.
//!
//! A [`StatusSink`] is anything that can show, hide or append a styled
//! message on a named target. The RPC client never depends on it; callers
//! bridge the two by building continuations with [`report_success`] and
//! [`report_error`].

mod board;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use ratatui::style::Color;
use serde_json::Value;

pub use board::{MessageBoard, StatusMessage};

/// Message severity, mirroring the page's alert levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }

    /// Get the display color for this severity.
    pub fn color(&self) -> Color {
        match self {
            Severity::Success => Color::Green,
            Severity::Info => Color::Cyan,
            Severity::Warning => Color::Yellow,
            Severity::Danger => Color::Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Severity::Success),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "danger" | "error" => Ok(Severity::Danger),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// A presentation target for feedback messages.
pub trait StatusSink {
    /// Replace the target's message and style.
    ///
    /// With `None` the target is hidden instead of shown.
    fn show(&mut self, target: &str, message: &str, style: Option<Severity>);

    /// Insert a new styled message directly after the target, leaving the
    /// target itself untouched.
    fn append(&mut self, target: &str, message: &str, style: Severity);

    /// Hide the target.
    fn hide(&mut self, target: &str) {
        self.show(target, "", None);
    }
}

/// Shared handle to a sink, for continuations that run on another task.
pub type SharedSink<S> = Arc<Mutex<S>>;

/// Build an `on_error` continuation that shows the error as `Danger`.
pub fn report_error<S>(sink: SharedSink<S>, target: &str) -> impl FnOnce(String)
where
    S: StatusSink,
{
    let target = target.to_string();
    move |message: String| {
        match sink.lock() {
            Ok(mut sink) => sink.show(&target, &message, Some(Severity::Danger)),
            Err(_) => tracing::error!("Status sink poisoned; dropped error: {}", message),
        };
    }
}

/// Build an `on_success` continuation that shows `render(result)` as
/// `Success`.
pub fn report_success<S, R>(
    sink: SharedSink<S>,
    target: &str,
    render: R,
) -> impl FnOnce(Value)
where
    S: StatusSink,
    R: FnOnce(&Value) -> String,
{
    let target = target.to_string();
    move |result: Value| {
        let message = render(&result);
        match sink.lock() {
            Ok(mut sink) => sink.show(&target, &message, Some(Severity::Success)),
            Err(_) => tracing::error!("Status sink poisoned; dropped result: {}", message),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_parse_and_display() {
        assert_eq!("danger".parse::<Severity>().unwrap(), Severity::Danger);
        assert_eq!(" Warning ".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("error".parse::<Severity>().unwrap(), Severity::Danger);
        assert!("loud".parse::<Severity>().is_err());
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn test_severity_colors_are_distinct() {
        let colors = [
            Severity::Success.color(),
            Severity::Info.color(),
            Severity::Warning.color(),
            Severity::Danger.color(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_report_error_shows_danger() {
        let sink = Arc::new(Mutex::new(MessageBoard::new()));
        let on_error = report_error(Arc::clone(&sink), "status");

        on_error("bad: input".to_string());

        let board = sink.lock().unwrap();
        let primary = board.primary("status").unwrap();
        assert_eq!(primary.text, "bad: input");
        assert_eq!(primary.severity, Some(Severity::Danger));
        assert!(primary.visible);
    }

    #[test]
    fn test_report_success_renders_result() {
        let sink = Arc::new(Mutex::new(MessageBoard::new()));
        let on_success = report_success(Arc::clone(&sink), "status", |v| format!("hashrate {}", v));

        on_success(json!(7));

        let board = sink.lock().unwrap();
        let primary = board.primary("status").unwrap();
        assert_eq!(primary.text, "hashrate 7");
        assert_eq!(primary.severity, Some(Severity::Success));
    }

    #[test]
    fn test_hide_default_method() {
        let mut board = MessageBoard::new();
        board.show("status", "visible", Some(Severity::Info));
        board.hide("status");

        let primary = board.primary("status").unwrap();
        assert!(!primary.visible);
        assert_eq!(primary.severity, None);
    }
}
