//! Application service — VPC DNS verification use-case.
//!
//! Much lighter than the egress path: two attribute queries against the
//! provider, no instance is ever provisioned.

use tracing::{error, info};

use crate::application::ports::{DnsInspection, ProgressReporter};
use crate::domain::error::Exception;
use crate::domain::probe::VpcAttribute;
use crate::domain::report::RunOutput;

/// Verify that DNS support and DNS hostnames are both enabled on a VPC.
///
/// Each attribute-fetch fault is recorded as an error. The conjunction is
/// only evaluated when both fetches succeeded; a single exception is
/// recorded when either attribute is disabled.
pub async fn verify_dns(
    gateway: &impl DnsInspection,
    reporter: &impl ProgressReporter,
    vpc_id: &str,
) -> RunOutput {
    let mut out = RunOutput::new();
    info!(vpc = vpc_id, "verifying DNS config for VPC");
    reporter.step("querying VPC DNS attributes");

    let support = fetch_attribute(gateway, vpc_id, VpcAttribute::DnsSupport, &mut out).await;
    let hostnames = fetch_attribute(gateway, vpc_id, VpcAttribute::DnsHostnames, &mut out).await;

    if let (Some(support), Some(hostnames)) = (support, hostnames) {
        info!(vpc = vpc_id, support, hostnames, "VPC DNS attributes");
        if support && hostnames {
            reporter.success("VPC DNS configuration verified");
        } else {
            error!(
                vpc = vpc_id,
                "both DNS support and DNS hostnames must be enabled for a managed cluster"
            );
            out.record_exception(Exception::DnsConfig {
                vpc_id: vpc_id.to_owned(),
            });
        }
    }
    out
}

async fn fetch_attribute(
    gateway: &impl DnsInspection,
    vpc_id: &str,
    attribute: VpcAttribute,
    out: &mut RunOutput,
) -> Option<bool> {
    match gateway.vpc_attribute_enabled(vpc_id, attribute).await {
        Ok(enabled) => Some(enabled),
        Err(e) => {
            out.record_error(e);
            None
        }
    }
}
