//! Styled terminal output
//!
//! Consistent symbols for hook output: ✔ success, ✖ error, ⚠ warning,
//! ℹ info. Verbose lines are dimmed and only printed when verbose is on.

use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message. Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a verbose step with a leading symbol
    pub fn verbose_step(&self, symbol: &str, message: &str) {
        if self.verbose {
            println!("{} {}", style(symbol).cyan(), style(message).dim());
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  {} {}", style("•").cyan(), item);
        }
    }

    /// Print captured tool output, indented under the message it belongs to.
    /// Goes to stderr so it survives quiet mode alongside the error.
    pub fn captured(&self, label: &str, text: &str) {
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        eprintln!("  {}", style(label).dim());
        for line in text.lines() {
            eprintln!("    {line}");
        }
    }
}
