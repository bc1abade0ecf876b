//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeMap;

use crate::domain::error::VerifierError;
use crate::domain::probe::{
    InstanceId, ShapeDescription, StatusObservation, VpcAttribute,
};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Launch parameters for creating a new probe instance.
#[derive(Debug)]
pub struct LaunchSpec<'a> {
    /// Image the probe instance boots from.
    pub image_id: &'a str,
    /// Subnet the probe attaches to.
    pub subnet_id: &'a str,
    /// Compute shape, e.g. `"t3.micro"`.
    pub shape: &'a str,
    /// Base64-encoded boot script, passed as instance boot metadata.
    pub boot_script: &'a str,
    /// Root-volume encryption key; `None` means the account default.
    pub kms_key_id: Option<&'a str>,
    /// Tags applied to the created instance.
    pub tags: &'a BTreeMap<String, String>,
}

// ── Provider Gateway Traits ───────────────────────────────────────────────────

/// Probe instance creation.
#[allow(async_fn_in_trait)]
pub trait ComputeProvisioning {
    /// Create one probe instance and return its provider-assigned id.
    async fn create_instance(&self, spec: &LaunchSpec<'_>) -> Result<InstanceId, VerifierError>;
}

/// Instance and shape inspection.
#[allow(async_fn_in_trait)]
pub trait ComputeInspection {
    /// Observe the instance's current lifecycle phase.
    ///
    /// Implementations must report a missing instance as
    /// [`StatusObservation::NotVisible`] (providers lag instance
    /// visibility) and more than one match as
    /// [`VerifierError::AmbiguousInstance`].
    async fn instance_status(&self, id: &InstanceId) -> Result<StatusObservation, VerifierError>;

    /// Describe a compute shape, used once before any instance is created
    /// to reject shapes that cannot report status/console reliably.
    async fn describe_instance_shape(&self, shape: &str)
    -> Result<ShapeDescription, VerifierError>;
}

/// Console-log harvesting.
#[allow(async_fn_in_trait)]
pub trait ConsoleLogRetrieval {
    /// Fetch and decode the latest console snapshot.
    ///
    /// `Ok(None)` means the provider has no output yet. An undecodable
    /// payload is reported as [`VerifierError::ConsoleDecode`] so the
    /// caller can retry on the next poll tick instead of failing the run.
    async fn fetch_console_log(&self, id: &InstanceId) -> Result<Option<String>, VerifierError>;
}

/// Probe instance teardown.
#[allow(async_fn_in_trait)]
pub trait ComputeTeardown {
    async fn terminate_instance(&self, id: &InstanceId) -> Result<(), VerifierError>;
}

/// Network DNS-attribute inspection, used by the DNS verification path.
#[allow(async_fn_in_trait)]
pub trait DnsInspection {
    /// Whether the given DNS attribute is enabled on the VPC.
    async fn vpc_attribute_enabled(
        &self,
        vpc_id: &str,
        attribute: VpcAttribute,
    ) -> Result<bool, VerifierError>;
}

/// Composite trait — any type implementing all capability sub-traits is a
/// `ProviderGateway`.
pub trait ProviderGateway:
    ComputeProvisioning + ComputeInspection + ConsoleLogRetrieval + ComputeTeardown + DnsInspection
{
}

/// Blanket implementation: any type implementing all capability sub-traits
/// is a `ProviderGateway`.
impl<T> ProviderGateway for T where
    T: ComputeProvisioning
        + ComputeInspection
        + ConsoleLogRetrieval
        + ComputeTeardown
        + DnsInspection
{
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
