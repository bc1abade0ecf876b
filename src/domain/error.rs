//! Typed domain error enums.
//!
//! The verification report separates three kinds of findings (see
//! [`crate::domain::report::RunOutput`]): `failures` are plain evidence
//! strings, `exceptions` are structural problems the probe itself detected,
//! and `errors` are faults of the checking process. This module defines the
//! latter two as `thiserror` enums; it has zero imports from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::time::Duration;

use thiserror::Error;

use crate::domain::probe::InstanceId;

// ── Exceptions ────────────────────────────────────────────────────────────────

/// Structural problems detected by the probe — as opposed to specific
/// unreachable targets (failures) or faults of the tooling (errors).
///
/// At most one exception per condition class is recorded per run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Exception {
    #[error(
        "internet connectivity problem: please ensure there's internet access in the given vpc subnets"
    )]
    ConnectivityProblem,

    #[error(
        "VPC DNS verification failed: DNS support and DNS hostnames must both be enabled on VPC {vpc_id}"
    )]
    DnsConfig { vpc_id: String },
}

// ── Verifier errors ───────────────────────────────────────────────────────────

/// Faults of the checking process itself.
///
/// When one of these is recorded the verification result cannot be trusted;
/// callers must report it distinctly from failures and exceptions.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("missing required permissions for account: {0}")]
    PermissionDenied(String),

    #[error("timed out waiting for {waiting_for} after {budget:?}")]
    DeadlineExceeded {
        waiting_for: &'static str,
        budget: Duration,
    },

    #[error("found {count} instances for id {instance_id}, expected exactly one")]
    AmbiguousInstance { instance_id: InstanceId, count: usize },

    #[error("no default image found for region {region}")]
    NoDefaultImage { region: String },

    #[error("instance shape {shape} not known to the provider")]
    ShapeNotFound { shape: String },

    #[error(
        "instance shape {shape} uses hypervisor {hypervisor}; a nitro shape is required for reliable result collection"
    )]
    UnsupportedShape { shape: String, hypervisor: String },

    #[error("console output could not be decoded: {0}")]
    ConsoleDecode(String),

    #[error("{backend} backend does not implement {operation}")]
    NotImplemented {
        backend: &'static str,
        operation: &'static str,
    },

    #[error(transparent)]
    Api(#[from] anyhow::Error),
}
