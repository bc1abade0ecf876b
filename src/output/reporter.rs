//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending
//! on any presentation type directly. When stdout is an interactive
//! terminal, steps drive a spinner; otherwise they print as plain lines.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        let spinner = ctx
            .show_progress()
            .then(|| progress::spinner("verifying network"));
        Self { ctx, spinner }
    }

    /// Stop and clear the spinner so the final report prints cleanly.
    pub fn finish(&self) {
        if let Some(pb) = &self.spinner {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        match &self.spinner {
            Some(pb) => pb.set_message(message.to_owned()),
            None if !self.ctx.quiet => println!("  {} {message}", "→".style(self.ctx.styles.dim)),
            None => {}
        }
    }

    fn success(&self, message: &str) {
        match &self.spinner {
            Some(pb) => progress::finish_ok(pb, message),
            None if !self.ctx.quiet => {
                println!("  {} {message}", "✓".style(self.ctx.styles.success));
            }
            None => {}
        }
    }

    fn warn(&self, message: &str) {
        match &self.spinner {
            Some(pb) => pb.println(format!("  ⚠ {message}")),
            None if !self.ctx.quiet => {
                println!("  {} {message}", "⚠".style(self.ctx.styles.warning));
            }
            None => {}
        }
    }
}
