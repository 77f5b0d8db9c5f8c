use console::style;
use imgconv_common::TargetFormat;
use imgconv_core::{ConversionReport, FileOutcome};
use std::path::Path;

/// Output formatter with colored messages
pub struct OutputFormatter {
    colored: bool,
}

impl OutputFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("{} {}", style("✓").green().bold(), message);
        } else {
            println!("[SUCCESS] {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", style("✗").red().bold(), message);
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        if self.colored {
            println!("{} {}", style("⚠").yellow().bold(), message);
        } else {
            println!("[WARN] {}", message);
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{} {}", style("ℹ").cyan(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Format file path
    pub fn format_path(&self, path: &Path) -> String {
        if self.colored {
            style(path.display()).cyan().to_string()
        } else {
            path.display().to_string()
        }
    }

    /// Format target format
    pub fn format_format(&self, format: TargetFormat) -> String {
        if self.colored {
            style(format.to_string()).magenta().to_string()
        } else {
            format.to_string()
        }
    }

    /// Print the report line for one file
    pub fn print_outcome(&self, outcome: &FileOutcome) {
        match &outcome.result {
            Ok(file) => self.success(&format!(
                "Converted {} → {} ({}x{})",
                self.format_path(&outcome.source),
                self.format_path(&file.destination),
                file.width,
                file.height
            )),
            Err(_) if outcome.is_cancelled() => self.warn(&format!(
                "Skipped {} (cancelled)",
                self.format_path(&outcome.source)
            )),
            Err(e) => self.error(&format!(
                "Failed to convert {}: {}",
                self.format_path(&outcome.source),
                e
            )),
        }
    }

    /// Print every outcome followed by the summary
    pub fn print_report(&self, report: &ConversionReport) {
        for outcome in &report.outcomes {
            self.print_outcome(outcome);
        }
        self.print_batch_summary(
            report.len(),
            report.succeeded(),
            report.failed(),
            report.cancelled(),
        );
    }

    /// Print batch summary
    pub fn print_batch_summary(
        &self,
        total: usize,
        success: usize,
        failed: usize,
        cancelled: usize,
    ) {
        println!();
        if self.colored {
            println!(
                "{} Total: {}, {} Success: {}, {} Failed: {}, {} Cancelled: {}",
                style("Summary:").bold(),
                total,
                style("✓").green(),
                success,
                style("✗").red(),
                failed,
                style("⚠").yellow(),
                cancelled
            );
        } else {
            println!(
                "Summary: Total: {}, Success: {}, Failed: {}, Cancelled: {}",
                total, success, failed, cancelled
            );
        }
    }

    /// Print the format table with codec availability
    pub fn print_formats(&self, available: impl Fn(TargetFormat) -> bool) {
        for format in TargetFormat::all() {
            let status = if available(format) {
                String::new()
            } else if self.colored {
                style(" (codec not built in)").dim().to_string()
            } else {
                " (codec not built in)".to_string()
            };
            // pad before styling, ANSI codes would throw the width off
            let name = format!("{:<6}", format.name());
            let name = if self.colored {
                style(name).magenta().to_string()
            } else {
                name
            };
            println!("{} .{}{}", name, format.extension(), status);
        }
    }
}

