//! Terminal spinner scoped to a single operation.
//!
//! The spinner ticks on indicatif's background thread and only ever touches
//! its own bar. It is finished on every exit path: explicitly through
//! [`ProgressGuard::succeed`] / [`ProgressGuard::fail`], or by `Drop` when the
//! owning future is cancelled or unwinds.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];
const TICK: Duration = Duration::from_millis(80);

pub struct ProgressGuard {
    bar: Option<ProgressBar>,
    message: String,
}

impl ProgressGuard {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(FRAMES);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.clone());
        bar.enable_steady_tick(TICK);

        Self {
            bar: Some(bar),
            message,
        }
    }

    /// Guard that never draws; used when output is not a terminal.
    pub fn hidden(message: impl Into<String>) -> Self {
        Self {
            bar: Some(ProgressBar::hidden()),
            message: message.into(),
        }
    }

    pub fn succeed(mut self) {
        if let Some(bar) = self.bar.take() {
            let done = self.message.replace("...", " ✓");
            bar.finish_and_clear();
            if !bar.is_hidden() {
                eprintln!("{} {}", "✓".green(), done);
            }
        }
    }

    pub fn fail(mut self, error: &dyn Display) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            if !bar.is_hidden() {
                eprintln!("{} Failed: {}", "✗".red(), error);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Run `operation` with an optional spinner around it.
pub async fn tracked<T, E, F>(guard: Option<ProgressGuard>, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let result = operation.await;

    if let Some(guard) = guard {
        match &result {
            Ok(_) => guard.succeed(),
            Err(e) => guard.fail(e),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracked_passes_result_through() {
        let ok: Result<u32, String> =
            tracked(Some(ProgressGuard::hidden("Executing x...")), async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> =
            tracked(Some(ProgressGuard::hidden("Executing x...")), async { Err("boom".to_string()) })
                .await;
        assert_eq!(err, Err("boom".to_string()));

        let bare: Result<u32, String> = tracked(None, async { Ok(1) }).await;
        assert_eq!(bare, Ok(1));
    }

    #[test]
    fn test_guard_released_on_drop() {
        let guard = ProgressGuard::hidden("work...");
        assert!(guard.is_active());
        drop(guard);
    }
}
