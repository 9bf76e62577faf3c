//! Per-run session transcript and the repetition window

use serde_json::Value;
use std::collections::VecDeque;

/// Append-only record of tool outputs and failures for one run.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_output(&mut self, tool_name: &str, args: &Value, result: &Value) {
        self.entries
            .push(format!("Output of {} with args {}: {}", tool_name, args, result));
    }

    pub fn record_error(&mut self, tool_name: &str, args: &Value, error: &dyn std::fmt::Display) {
        self.entries
            .push(format!("Error from {} with args {}: {}", tool_name, args, error));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context handed to the selector and validator.
    pub fn joined(&self) -> String {
        self.entries.join("\n")
    }

    /// Context handed to the answer synthesizer.
    pub fn joined_for_answer(&self) -> String {
        self.entries.join("\n\n")
    }
}

pub const REPEAT_WINDOW: usize = 4;

/// Sliding window over the most recent action signatures.
#[derive(Debug, Clone, Default)]
pub struct ActionWindow {
    recent: VecDeque<String>,
}

impl ActionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signature; true once the window is full of one repeated action.
    pub fn push(&mut self, signature: String) -> bool {
        self.recent.push_back(signature);
        while self.recent.len() > REPEAT_WINDOW {
            self.recent.pop_front();
        }
        self.is_stuck()
    }

    pub fn is_stuck(&self) -> bool {
        self.recent.len() == REPEAT_WINDOW
            && self.recent.iter().all(|s| Some(s) == self.recent.front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcript_line_formats_and_order() {
        let mut transcript = Transcript::new();
        let args = json!({"ticker": "AAPL"});
        transcript.record_output("get_income_statements", &args, &json!({"revenue": 1}));
        transcript.record_error("get_balance_sheets", &args, &"503 Service Unavailable");

        assert_eq!(
            transcript.entries(),
            &[
                r#"Output of get_income_statements with args {"ticker":"AAPL"}: {"revenue":1}"#.to_string(),
                r#"Error from get_balance_sheets with args {"ticker":"AAPL"}: 503 Service Unavailable"#.to_string(),
            ]
        );
        assert_eq!(transcript.joined().lines().count(), 2);
        assert!(transcript.joined_for_answer().contains("}\n\nError from"));
    }

    #[test]
    fn test_window_trips_on_four_identical() {
        let mut window = ActionWindow::new();
        assert!(!window.push("X:1".into()));
        assert!(!window.push("X:1".into()));
        assert!(!window.push("X:1".into()));
        assert!(window.push("X:1".into()));
    }

    #[test]
    fn test_window_resets_on_different_action() {
        let mut window = ActionWindow::new();
        for _ in 0..3 {
            window.push("X:1".into());
        }
        assert!(!window.push("Y:1".into()));
        assert!(!window.push("X:1".into()));
        assert!(!window.push("X:1".into()));
        assert!(!window.push("X:1".into()));
        assert!(window.push("X:1".into()));
    }
}
