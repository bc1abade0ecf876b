//! Run output aggregation.

use std::fmt::Write as _;

use crate::domain::error::{Exception, VerifierError};

/// Findings accumulated over one verification run.
///
/// The three collections are never merged: `failures` and `exceptions` mean
/// the network under test is broken, `errors` means the checking process
/// itself could not be trusted. A run passed iff all three are empty.
///
/// One aggregator belongs to exactly one run; both public operations return
/// an owned `RunOutput` on every path, so callers can always inspect it.
#[derive(Debug, Default)]
pub struct RunOutput {
    failures: Vec<String>,
    exceptions: Vec<Exception>,
    errors: Vec<VerifierError>,
}

impl RunOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unreachable-endpoint evidence, verbatim and in order.
    pub fn record_failures<I>(&mut self, evidence: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.failures.extend(evidence);
    }

    pub fn record_exception(&mut self, exception: Exception) {
        self.exceptions.push(exception);
    }

    pub fn record_error(&mut self, error: VerifierError) {
        self.errors.push(error);
    }

    /// True iff no failures, exceptions, or errors were recorded.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && self.exceptions.is_empty() && self.errors.is_empty()
    }

    /// The three collections, for programmatic inspection.
    #[must_use]
    pub fn parse(&self) -> (&[String], &[Exception], &[VerifierError]) {
        (&self.failures, &self.exceptions, &self.errors)
    }

    /// Plain-text rendering of all three collections.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_successful() {
            return "All network verification checks passed.".to_owned();
        }
        let mut text = String::new();
        render_section(&mut text, "Egress failures", &self.failures);
        render_section(&mut text, "Exceptions", &self.exceptions);
        render_section(&mut text, "Errors", &self.errors);
        text.trim_end().to_owned()
    }

    /// JSON rendering of the report, used by the `--json` output path.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "successful": self.is_successful(),
            "failures": self.failures,
            "exceptions": self.exceptions.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "errors": self.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })
    }
}

fn render_section<T: ToString>(text: &mut String, title: &str, entries: &[T]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(text, "{title} ({}):", entries.len());
    for entry in entries {
        let _ = writeln!(text, "  - {}", entry.to_string());
    }
}
