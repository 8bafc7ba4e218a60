//! Accumulated check results and the output files the surrounding
//! pipeline reads to decide follow-up actions (e.g. reopening the issue).

use std::path::Path;

use colored::Colorize;

use crate::error::Result;

const SUCCESS_HEADER: &str = "These checks passed:";
const FAILURE_HEADER: &str = "Reopening issue due to failed verification:";

/// Ordered success and failure messages for one run. Every check appends
/// here regardless of earlier failures, so a single run reports
/// everything that is wrong at once.
#[derive(Default)]
pub struct CheckReport {
    successes: Vec<String>,
    failures: Vec<String>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.successes.push(message.into());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Print the report to stdout, green checkmarks for passes and red
    /// crosses for failures.
    pub fn print(&self) {
        for message in &self.successes {
            println!("{} {message}", "✓".green());
        }
        for message in &self.failures {
            println!("{} {message}", "✗".red().bold());
        }
    }

    /// Flush the report to the two files the pipeline consumes. The
    /// success file is always written; the failure file only when a
    /// check failed.
    pub fn write_files(&self, success_path: &Path, error_path: &Path) -> Result<()> {
        std::fs::write(success_path, join_with_header(SUCCESS_HEADER, &self.successes))?;

        if !self.is_ok() {
            std::fs::write(error_path, join_with_header(FAILURE_HEADER, &self.failures))?;
        }

        Ok(())
    }
}

fn join_with_header(header: &str, messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut out = String::from(header);
    for message in messages {
        out.push_str("\n- ");
        out.push_str(message);
    }
    out
}
