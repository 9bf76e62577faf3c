//! Colored terminal renderer for the interactive front end

use crate::models::{RunOutcome, Task};
use crate::presentation::AgentObserver;
use crate::progress::ProgressGuard;
use owo_colors::OwoColorize;
use serde_json::Value;

const ANSWER_WIDTH: usize = 80;
const ARGS_PREVIEW: usize = 50;
/// Narrowest box that still fits the title with a margin.
const MIN_ANSWER_WIDTH: usize = 12;

pub struct ConsoleObserver {
    /// Whether to use colored output and spinners
    pub colored: bool,
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn intro(&self) {
        let title = format!("Dexter · financial research agent v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!("\n{}", title.bright_cyan().bold());
            println!("{}\n", "Ask a question about a company's financials. Type 'exit' to quit.".dimmed());
        } else {
            println!("\n{}", title);
            println!("Ask a question about a company's financials. Type 'exit' to quit.\n");
        }
    }

    fn header(&self, text: &str) {
        if self.colored {
            println!("\n{}", format!("╭─ {}", text).blue().bold());
        } else {
            println!("\n== {}", text);
        }
    }

    fn info(&self, message: &str) {
        if self.colored {
            println!("{}", message.dimmed());
        } else {
            println!("{}", message);
        }
    }

    fn warning(&self, message: &str) {
        if self.colored {
            println!("{} {}", "⚠ Warning:".yellow(), message);
        } else {
            println!("[WARN] {}", message);
        }
    }

    pub fn print_answer(&self, answer: &str) {
        let lines = render_answer_box(answer, ANSWER_WIDTH);
        println!();
        for line in lines {
            if self.colored {
                println!("{}", line.blue());
            } else {
                println!("{}", line);
            }
        }
        println!();
    }
}

impl AgentObserver for ConsoleObserver {
    fn planning_started(&self) {
        self.info("Planning tasks...");
    }

    fn tasks_listed(&self, tasks: &[Task]) {
        if tasks.is_empty() {
            return;
        }
        self.header("Planned Tasks");
        for task in tasks {
            if self.colored {
                println!("{} {} {}", "│".blue(), "+".dimmed(), task.description);
            } else {
                println!("| + {}", task.description);
            }
        }
        if self.colored {
            println!("{}\n", format!("╰{}", "─".repeat(50)).blue());
        } else {
            println!();
        }
    }

    fn no_tasks(&self) {
        self.info("No research tasks needed; answering directly.");
    }

    fn task_started(&self, task: &Task) {
        if self.colored {
            println!("\n{} {}", "▶ Task:".cyan().bold(), task.description);
        } else {
            println!("\n> Task: {}", task.description);
        }
    }

    fn tool_executing(&self, tool_name: &str, args: &Value) {
        let preview = truncate(&args.to_string(), ARGS_PREVIEW);
        if self.colored {
            println!("  {} {} {}", "⚡".yellow(), tool_name, format!("({})", preview).dimmed());
        } else {
            println!("  * {} ({})", tool_name, preview);
        }
    }

    fn task_completed(&self, task: &Task) {
        if self.colored {
            println!("{} {}", "  ✓ Completed".green(), format!("│ {}", task.description).dimmed());
        } else {
            println!("  [OK] {}", task.description);
        }
    }

    fn answer_generating(&self) {
        self.info("Generating answer...");
    }

    fn answer(&self, answer: &str) {
        self.print_answer(answer);
    }

    fn error(&self, message: &str) {
        if self.colored {
            println!("{} {}", "✗ Error:".red(), message);
        } else {
            println!("[ERROR] {}", message);
        }
    }

    fn run_finished(&self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Answered { .. } => {}
            RunOutcome::StuckLoop { signature, .. } => self.warning(&format!(
                "Detected repeating action {}, aborting to avoid loop.",
                truncate(signature, ARGS_PREVIEW)
            )),
            RunOutcome::BudgetExhausted { steps } => {
                self.warning(&format!("Global max steps reached after {} steps, stopping.", steps))
            }
        }
    }

    fn progress(&self, message: &str) -> Option<ProgressGuard> {
        if self.colored {
            Some(ProgressGuard::start(message))
        } else {
            None
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Boxed ANSWER panel, word-wrapped to `width` columns (at least 12).
pub fn render_answer_box(answer: &str, width: usize) -> Vec<String> {
    let width = width.max(MIN_ANSWER_WIDTH);
    let inner = width.saturating_sub(2);
    let text_width = width.saturating_sub(4);
    let blank = format!("║{}║", " ".repeat(inner));

    let title = "ANSWER";
    let left = (inner - title.len()) / 2;
    let right = inner - title.len() - left;

    let mut lines = vec![
        format!("╔{}╗", "═".repeat(inner)),
        format!("║{}{}{}║", " ".repeat(left), title, " ".repeat(right)),
        format!("╠{}╣", "═".repeat(inner)),
        blank.clone(),
    ];

    for paragraph in answer.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(blank.clone());
            continue;
        }
        for row in wrap_words(paragraph, text_width.saturating_sub(2)) {
            let padding = text_width.saturating_sub(row.chars().count());
            lines.push(format!("║ {}{} ║", row, " ".repeat(padding)));
        }
    }

    lines.push(blank);
    lines.push(format!("╚{}╝", "═".repeat(inner)));
    lines
}

/// Greedy word wrap; words longer than `max_chars` are split across rows.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if word.chars().count() > max_chars {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).map(|c| c.iter().collect::<String>());
            let last = chunks.next_back().unwrap_or_default();
            rows.extend(chunks);
            current = last;
            continue;
        }

        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > max_chars && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_box_has_fixed_width() {
        let answer = "Apple reported revenue of 94800000000 for the quarter, driven by strong iPhone and services sales across every region it operates in.\n\nNet income rose.";
        let lines = render_answer_box(answer, 80);

        assert!(lines.iter().all(|l| l.chars().count() == 80));
        assert!(lines[1].contains("ANSWER"));
        assert!(lines.iter().any(|l| l.contains("94800000000")));
        assert!(lines.last().unwrap().starts_with('╚'));
    }

    #[test]
    fn test_wrap_words() {
        let rows = wrap_words("one two three four", 9);
        assert_eq!(rows, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_words_splits_long_words() {
        let rows = wrap_words("see https://example.com/aapl end", 8);
        assert_eq!(rows, vec!["see", "https://", "example.", "com/aapl", "end"]);
        assert!(rows.iter().all(|r| r.chars().count() <= 8));
    }

    #[test]
    fn test_answer_box_narrow_width_and_long_word() {
        let url = "https://api.financialdatasets.ai/financials/income-statements?ticker=AAPL&period=quarterly";
        let lines = render_answer_box(&format!("Source: {}", url), 40);
        assert!(lines.iter().all(|l| l.chars().count() == 40));

        for width in 0..MIN_ANSWER_WIDTH {
            let lines = render_answer_box("Revenue grew.", width);
            assert!(lines.iter().all(|l| l.chars().count() == MIN_ANSWER_WIDTH));
            assert!(lines[1].contains("ANSWER"));
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn test_no_color_has_no_spinner() {
        assert!(ConsoleObserver::no_color().progress("x").is_none());
    }
}
