//! Probe request and instance observation types.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Provider-assigned identifier of a probe instance.
///
/// The join key for every inspection and teardown call after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proxy and TLS context forwarded into the probe's boot script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    /// PEM-encoded CA bundle trusted by the probe.
    pub ca_bundle: Option<String>,
    /// Skip TLS verification inside the probe.
    pub no_tls: bool,
}

/// Immutable input to one egress verification run.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Region the probe instance is provisioned in. Also selects the default
    /// image and is forwarded into the boot script.
    pub region: String,
    /// Subnet the probe instance attaches to.
    pub subnet_id: String,
    /// Compute shape of the probe instance, e.g. `"t3.micro"`.
    pub instance_shape: String,
    /// Image override; when `None` the per-region default table is used.
    pub image_id: Option<String>,
    /// Key used to encrypt the probe's root volume; `None` means the
    /// account default key.
    pub kms_key_id: Option<String>,
    /// Tags applied to every created cloud resource. Ordered so request
    /// construction is deterministic.
    pub tags: BTreeMap<String, String>,
    /// Timeout for each individual egress request made by the validator.
    pub timeout: Duration,
    pub proxy: ProxyConfig,
}

/// Lifecycle phase of a probe instance as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstancePhase {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
}

impl InstancePhase {
    /// Map a provider state name to a phase. Returns `None` for names this
    /// tool does not know about.
    #[must_use]
    pub fn from_state_name(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "shutting-down" => Some(Self::ShuttingDown),
            "terminated" => Some(Self::Terminated),
            "stopping" => Some(Self::Stopping),
            "stopped" => Some(Self::Stopped),
            _ => None,
        }
    }
}

/// One status-inspection observation.
///
/// Providers may lag instance visibility, so "no matching instance" is an
/// expected observation shortly after creation, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusObservation {
    /// The provider returned no status for the instance yet.
    NotVisible,
    Observed(InstancePhase),
}

/// Description of a compute shape, fetched once before any instance is
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDescription {
    pub shape: String,
    pub hypervisor: String,
}

impl ShapeDescription {
    /// Whether the shape's virtualization tier supports reliable status and
    /// console reporting. Only the nitro tier qualifies.
    #[must_use]
    pub fn supports_reliable_console(&self) -> bool {
        self.hypervisor == "nitro"
    }
}

/// DNS-related attributes of a network, queried one at a time so each fetch
/// fault can be reported independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VpcAttribute {
    DnsSupport,
    DnsHostnames,
}
