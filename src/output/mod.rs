//! Output formatting module

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

use crate::domain::report::RunOutput;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗`. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print the verification report, one styled section per populated
    /// collection.
    pub fn print_summary(&self, output: &RunOutput) {
        if output.is_successful() {
            self.success("all network verification checks passed");
            return;
        }
        let (failures, exceptions, errors) = output.parse();
        if !failures.is_empty() {
            println!("{}", "Egress failures:".style(self.styles.header));
            for failure in failures {
                println!("  {} {failure}", "✗".style(self.styles.error));
            }
        }
        if !exceptions.is_empty() {
            println!("{}", "Exceptions:".style(self.styles.header));
            for exception in exceptions {
                println!("  {} {exception}", "⚠".style(self.styles.warning));
            }
        }
        if !errors.is_empty() {
            println!("{}", "Errors:".style(self.styles.header));
            for error in errors {
                println!("  {} {error}", "✗".style(self.styles.error));
            }
        }
    }
}
