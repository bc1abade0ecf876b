//! GCP provider gateway — unfinished backend.
//!
//! Every capability returns an explicit "not implemented" error. A silent
//! no-op success would let a run report a network as verified without any
//! probe having run; refusing loudly keeps the error taxonomy honest until
//! the backend lands.

use crate::application::ports::{
    ComputeInspection, ComputeProvisioning, ComputeTeardown, ConsoleLogRetrieval, DnsInspection,
    LaunchSpec,
};
use crate::domain::error::VerifierError;
use crate::domain::probe::{
    InstanceId, ShapeDescription, StatusObservation, VpcAttribute,
};

const BACKEND: &str = "GCP";

/// Placeholder gateway for the GCP backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct GcpGateway;

fn not_implemented(operation: &'static str) -> VerifierError {
    VerifierError::NotImplemented {
        backend: BACKEND,
        operation,
    }
}

impl ComputeProvisioning for GcpGateway {
    async fn create_instance(&self, _spec: &LaunchSpec<'_>) -> Result<InstanceId, VerifierError> {
        Err(not_implemented("create_instance"))
    }
}

impl ComputeInspection for GcpGateway {
    async fn instance_status(
        &self,
        _id: &InstanceId,
    ) -> Result<StatusObservation, VerifierError> {
        Err(not_implemented("instance_status"))
    }

    async fn describe_instance_shape(
        &self,
        _shape: &str,
    ) -> Result<ShapeDescription, VerifierError> {
        Err(not_implemented("describe_instance_shape"))
    }
}

impl ConsoleLogRetrieval for GcpGateway {
    async fn fetch_console_log(&self, _id: &InstanceId) -> Result<Option<String>, VerifierError> {
        Err(not_implemented("fetch_console_log"))
    }
}

impl ComputeTeardown for GcpGateway {
    async fn terminate_instance(&self, _id: &InstanceId) -> Result<(), VerifierError> {
        Err(not_implemented("terminate_instance"))
    }
}

impl DnsInspection for GcpGateway {
    async fn vpc_attribute_enabled(
        &self,
        _vpc_id: &str,
        _attribute: VpcAttribute,
    ) -> Result<bool, VerifierError> {
        Err(not_implemented("vpc_attribute_enabled"))
    }
}
