//! `netverify egress` — probe egress reachability from a subnet.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::application::config::{self, VerifierConfig};
use crate::application::services::egress::validate_egress;
use crate::commands::{parse_tags, report, resolve_region};
use crate::domain::probe::{ProbeRequest, ProxyConfig};
use crate::infra::aws::AwsCliGateway;
use crate::output::OutputContext;
use crate::output::reporter::TerminalReporter;

/// Arguments for the egress command.
#[derive(Args)]
pub struct EgressArgs {
    /// Source subnet ID to probe from
    #[arg(long = "subnet-id")]
    pub subnet_id: String,

    /// Cloud image for the probe instance (defaults to a per-region lookup)
    #[arg(long = "image-id")]
    pub image_id: Option<String>,

    /// Compute shape of the probe instance
    #[arg(long = "instance-type", default_value = config::DEFAULT_INSTANCE_SHAPE)]
    pub instance_type: String,

    /// Region to provision the probe in; falls back to $AWS_REGION, then us-east-1
    #[arg(long)]
    pub region: Option<String>,

    /// AWS profile; when set, ambient environment credentials are ignored
    #[arg(long)]
    pub profile: Option<String>,

    /// KMS key used to encrypt the probe's root volume (defaults to the account default key)
    #[arg(long = "kms-key-id")]
    pub kms_key_id: Option<String>,

    /// Tag to assign to created cloud resources, as key=value (repeatable)
    #[arg(long = "cloud-tags", value_name = "KEY=VALUE")]
    pub cloud_tags: Vec<String>,

    /// Timeout in seconds for individual egress requests
    #[arg(long, default_value_t = config::DEFAULT_PROBE_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// HTTP proxy URL the probe should use
    #[arg(long = "http-proxy")]
    pub http_proxy: Option<String>,

    /// HTTPS proxy URL the probe should use
    #[arg(long = "https-proxy")]
    pub https_proxy: Option<String>,

    /// Path to a PEM CA bundle the probe should trust
    #[arg(long)]
    pub cacert: Option<PathBuf>,

    /// Skip TLS verification inside the probe
    #[arg(long = "no-tls")]
    pub no_tls: bool,
}

/// Run the egress verification command.
///
/// # Errors
///
/// Returns an error on invalid arguments or when verification did not pass.
pub async fn run(ctx: &OutputContext, args: EgressArgs, json: bool) -> Result<()> {
    let region = resolve_region(args.region.as_deref());
    let ca_bundle = match &args.cacert {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading CA bundle {}", path.display()))?,
        ),
        None => None,
    };

    let request = ProbeRequest {
        region: region.clone(),
        subnet_id: args.subnet_id,
        instance_shape: args.instance_type,
        image_id: args.image_id,
        kms_key_id: args.kms_key_id,
        tags: parse_tags(&args.cloud_tags)?,
        timeout: Duration::from_secs(args.timeout),
        proxy: ProxyConfig {
            http_proxy: args.http_proxy,
            https_proxy: args.https_proxy,
            ca_bundle,
            no_tls: args.no_tls,
        },
    };

    let gateway = AwsCliGateway::new(region, args.profile);
    let reporter = TerminalReporter::new(ctx);
    let output = validate_egress(&gateway, &reporter, &VerifierConfig::default(), &request).await;
    reporter.finish();
    report(ctx, &output, json)
}
