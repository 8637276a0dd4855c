//! Response type for command execution results.

use std::time::Duration;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (command echo and trailing prompt removed).
    pub result: String,

    /// The raw output before cleanup.
    pub raw_result: String,

    /// The prompt line that ended the output.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Build a response from the raw reply, cleaning it up.
    pub fn new(
        command: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let raw_result = raw_result.into();
        Self {
            command: command.into(),
            result: strip_echo_and_prompt(&raw_result),
            raw_result,
            prompt: prompt.into(),
            elapsed,
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Drop the first line (command echo) and the last (prompt) of a
/// multi-line reply. Single-line replies are kept as is.
fn strip_echo_and_prompt(raw: &str) -> String {
    let lines = crate::parse::split_lines(raw);
    if lines.len() > 1 {
        lines[1..lines.len() - 1].join("\n")
    } else {
        raw.to_string()
    }
}
