//! AWS provider gateway.
//!
//! `AwsCliGateway<R>` routes every EC2 call through a `CommandRunner`
//! invoking the `aws` CLI with `--output json`. Generic over
//! `R: CommandRunner` so that tests can inject a canned runner without
//! spawning real processes. Credentials are ambient (environment or
//! `--profile`); this adapter never handles secrets itself.

use anyhow::anyhow;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use tracing::{debug, info};

use crate::application::ports::{
    ComputeInspection, ComputeProvisioning, ComputeTeardown, ConsoleLogRetrieval, DnsInspection,
    LaunchSpec,
};
use crate::domain::error::VerifierError;
use crate::domain::probe::{
    InstanceId, InstancePhase, ShapeDescription, StatusObservation, VpcAttribute,
};
use crate::infra::command_runner::{CommandRunner, DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Infrastructure adapter implementing the provider gateway against EC2.
pub struct AwsCliGateway<R: CommandRunner> {
    runner: R,
    region: String,
    profile: Option<String>,
}

impl AwsCliGateway<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn new(region: impl Into<String>, profile: Option<String>) -> Self {
        Self::with_runner(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), region, profile)
    }
}

impl<R: CommandRunner> AwsCliGateway<R> {
    /// Create a gateway with an explicit runner instance.
    pub fn with_runner(runner: R, region: impl Into<String>, profile: Option<String>) -> Self {
        Self {
            runner,
            region: region.into(),
            profile,
        }
    }

    /// Run one `aws ec2` subcommand and parse its JSON output.
    ///
    /// A non-zero exit with `UnauthorizedOperation` on stderr maps to
    /// [`VerifierError::PermissionDenied`]; any other non-zero exit maps to
    /// [`VerifierError::Api`].
    async fn ec2(&self, args: &[&str]) -> Result<Value, VerifierError> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 7);
        full.push("ec2");
        full.extend_from_slice(args);
        full.extend_from_slice(&["--region", &self.region, "--output", "json"]);
        if let Some(profile) = &self.profile {
            full.extend_from_slice(&["--profile", profile]);
        }

        let subcommand = args.first().copied().unwrap_or_default();
        debug!(%subcommand, region = %self.region, "invoking aws ec2");
        let output = self.runner.run("aws", &full).await.map_err(VerifierError::Api)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("UnauthorizedOperation") {
                return Err(VerifierError::PermissionDenied(stderr.trim().to_owned()));
            }
            return Err(VerifierError::Api(anyhow!(
                "aws ec2 {subcommand} failed: {}",
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&output.stdout).map_err(|e| {
            VerifierError::Api(anyhow::Error::new(e).context("parsing aws ec2 JSON output"))
        })
    }
}

impl<R: CommandRunner> ComputeProvisioning for AwsCliGateway<R> {
    async fn create_instance(&self, spec: &LaunchSpec<'_>) -> Result<InstanceId, VerifierError> {
        // The probe is VPC-aware, so the subnet rides on an explicit network
        // interface that also requests a public address.
        let network_interfaces = serde_json::json!([{
            "AssociatePublicIpAddress": true,
            "DeviceIndex": 0,
            "SubnetId": spec.subnet_id,
        }])
        .to_string();

        let mut ebs = serde_json::json!({
            "DeleteOnTermination": true,
            "Encrypted": true,
        });
        if let Some(kms_key_id) = spec.kms_key_id {
            ebs["KmsKeyId"] = Value::String(kms_key_id.to_owned());
        }
        let block_devices = serde_json::json!([{
            "DeviceName": "/dev/xvda",
            "Ebs": ebs,
        }])
        .to_string();

        let tag_specifications = serde_json::json!([{
            "ResourceType": "instance",
            "Tags": spec.tags
                .iter()
                .map(|(key, value)| serde_json::json!({ "Key": key, "Value": value }))
                .collect::<Vec<_>>(),
        }])
        .to_string();

        let response = self
            .ec2(&[
                "run-instances",
                "--image-id",
                spec.image_id,
                "--instance-type",
                spec.shape,
                "--count",
                "1",
                "--user-data",
                spec.boot_script,
                "--network-interfaces",
                &network_interfaces,
                "--block-device-mappings",
                &block_devices,
                "--tag-specifications",
                &tag_specifications,
            ])
            .await?;

        let instance_id = response
            .pointer("/Instances/0/InstanceId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                VerifierError::Api(anyhow!("run-instances response carries no instance id"))
            })?;
        info!(instance = instance_id, "created instance");
        Ok(InstanceId::from(instance_id))
    }
}

impl<R: CommandRunner> ComputeInspection for AwsCliGateway<R> {
    async fn instance_status(&self, id: &InstanceId) -> Result<StatusObservation, VerifierError> {
        let response = self
            .ec2(&["describe-instance-status", "--instance-ids", id.as_str()])
            .await?;

        let statuses = response
            .get("InstanceStatuses")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match statuses {
            // A fresh instance may not be returned at all; that is not a
            // fault, the caller keeps polling.
            [] => Ok(StatusObservation::NotVisible),
            [status] => {
                let name = status
                    .pointer("/InstanceState/Name")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                InstancePhase::from_state_name(name)
                    .map(StatusObservation::Observed)
                    .ok_or_else(|| {
                        VerifierError::Api(anyhow!("unknown instance state {name:?}"))
                    })
            }
            many => Err(VerifierError::AmbiguousInstance {
                instance_id: id.clone(),
                count: many.len(),
            }),
        }
    }

    async fn describe_instance_shape(
        &self,
        shape: &str,
    ) -> Result<ShapeDescription, VerifierError> {
        debug!(shape, "gathering instance shape description");
        let response = self
            .ec2(&["describe-instance-types", "--instance-types", shape])
            .await
            .map_err(|e| match e {
                VerifierError::Api(inner) if inner.to_string().contains("InvalidInstanceType") => {
                    VerifierError::ShapeNotFound {
                        shape: shape.to_owned(),
                    }
                }
                other => other,
            })?;

        let hypervisor = response
            .pointer("/InstanceTypes/0/Hypervisor")
            .and_then(Value::as_str)
            .ok_or_else(|| VerifierError::ShapeNotFound {
                shape: shape.to_owned(),
            })?;
        Ok(ShapeDescription {
            shape: shape.to_owned(),
            hypervisor: hypervisor.to_owned(),
        })
    }
}

impl<R: CommandRunner> ConsoleLogRetrieval for AwsCliGateway<R> {
    async fn fetch_console_log(&self, id: &InstanceId) -> Result<Option<String>, VerifierError> {
        let response = self
            .ec2(&["get-console-output", "--instance-id", id.as_str(), "--latest"])
            .await?;

        let Some(encoded) = response.get("Output").and_then(Value::as_str) else {
            return Ok(None);
        };
        // The provider hands the console log base64-encoded inside the JSON
        // body. An undecodable payload is a retry signal, not a run fault.
        let bytes = BASE64
            .decode(encoded.trim().as_bytes())
            .map_err(|e| VerifierError::ConsoleDecode(e.to_string()))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

impl<R: CommandRunner> ComputeTeardown for AwsCliGateway<R> {
    async fn terminate_instance(&self, id: &InstanceId) -> Result<(), VerifierError> {
        info!(instance = %id, "terminating instance");
        self.ec2(&["terminate-instances", "--instance-ids", id.as_str()])
            .await
            .map(|_| ())
    }
}

impl<R: CommandRunner> DnsInspection for AwsCliGateway<R> {
    async fn vpc_attribute_enabled(
        &self,
        vpc_id: &str,
        attribute: VpcAttribute,
    ) -> Result<bool, VerifierError> {
        let (flag, pointer) = match attribute {
            VpcAttribute::DnsSupport => ("enableDnsSupport", "/EnableDnsSupport/Value"),
            VpcAttribute::DnsHostnames => ("enableDnsHostnames", "/EnableDnsHostnames/Value"),
        };
        let response = self
            .ec2(&["describe-vpc-attribute", "--vpc-id", vpc_id, "--attribute", flag])
            .await?;
        response.pointer(pointer).and_then(Value::as_bool).ok_or_else(|| {
            VerifierError::Api(anyhow!("describe-vpc-attribute response carries no {flag}"))
        })
    }
}
