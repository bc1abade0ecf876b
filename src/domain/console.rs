//! Console-log classification.
//!
//! A pure function from harvested console text to a [`Classification`] —
//! no I/O, so fixtures can exercise it exhaustively.

use std::sync::LazyLock;

use regex::Regex;

/// Emitted by the boot script as its first line.
pub const SCRIPT_BEGIN_SENTINEL: &str = "USERDATA BEGIN";

/// Emitted by the boot script as its last line. The classifier searches for
/// this marker verbatim to decide whether the script has finished,
/// independent of whether it succeeded.
pub const SCRIPT_END_SENTINEL: &str = "USERDATA END";

/// Brackets the validator's own output inside the boot script run.
pub const VALIDATOR_BEGIN_SENTINEL: &str = "VALIDATOR START";
pub const VALIDATOR_END_SENTINEL: &str = "VALIDATOR END";

static UNREACHABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Unable to reach \S+").expect("valid regex"));

static FAULT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(.*Cannot.*)|(.*Could not.*)|(.*Failed.*)|(.*command not found.*)$")
        .expect("valid regex")
});

/// Outcome of one classification pass over a console snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// The end sentinel was observed; the boot script has finished.
    pub script_complete: bool,
    /// Every "Unable to reach …" phrase, verbatim, in order of appearance,
    /// duplicates retained.
    pub unreachable: Vec<String>,
    /// At least one line matched the fault-phrase set. Collapsed to a single
    /// flag for the whole snapshot.
    pub fault_detected: bool,
}

/// Classify decoded console text.
///
/// Callers are expected to keep polling while `script_complete` is false;
/// the evidence fields are only meaningful once the script has finished.
#[must_use]
pub fn classify(console_text: &str) -> Classification {
    Classification {
        script_complete: console_text.contains(SCRIPT_END_SENTINEL),
        unreachable: UNREACHABLE_RE
            .find_iter(console_text)
            .map(|m| m.as_str().to_owned())
            .collect(),
        fault_detected: FAULT_LINE_RE.is_match(console_text),
    }
}
