//! `netverify dns` — verify a VPC's DNS attributes.

use anyhow::Result;
use clap::Args;

use crate::application::services::dns::verify_dns;
use crate::commands::{report, resolve_region};
use crate::infra::aws::AwsCliGateway;
use crate::output::OutputContext;
use crate::output::reporter::TerminalReporter;

/// Arguments for the dns command.
#[derive(Args)]
pub struct DnsArgs {
    /// ID of the VPC under test
    #[arg(long = "vpc-id")]
    pub vpc_id: String,

    /// Region of the VPC; falls back to $AWS_REGION, then us-east-1
    #[arg(long)]
    pub region: Option<String>,

    /// AWS profile; when set, ambient environment credentials are ignored
    #[arg(long)]
    pub profile: Option<String>,
}

/// Run the DNS verification command.
///
/// # Errors
///
/// Returns an error when verification did not pass.
pub async fn run(ctx: &OutputContext, args: DnsArgs, json: bool) -> Result<()> {
    let region = resolve_region(args.region.as_deref());
    let gateway = AwsCliGateway::new(region, args.profile);
    let reporter = TerminalReporter::new(ctx);
    let output = verify_dns(&gateway, &reporter, &args.vpc_id).await;
    reporter.finish();
    report(ctx, &output, json)
}
