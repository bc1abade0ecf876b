//! Verifier configuration tables.
//!
//! Defaults live here as explicit data injected into the orchestrator's
//! call sites, never as ambient global state, so tests can supply alternate
//! tables.

use std::collections::BTreeMap;
use std::time::Duration;

/// Shape used when the caller does not specify one.
pub const DEFAULT_INSTANCE_SHAPE: &str = "t3.micro";

/// Region used when neither the caller nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Environment variable consulted for the region default.
pub const REGION_ENV_VAR: &str = "AWS_REGION";

/// Default timeout for each individual egress request made by the validator.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Interval and overall budget of one polling phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub deadline: Duration,
}

/// Injected configuration for the verification services.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Per-region default probe image, used when the request carries no
    /// image override.
    pub default_images: BTreeMap<String, String>,
    /// Image reference of the validator artifact run inside the probe.
    pub validator_image: String,
    /// Polling for the instance to reach its running phase.
    pub running_poll: PollSettings,
    /// Polling for the boot script to finish, observed via the console log.
    pub script_poll: PollSettings,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            default_images: default_images(),
            validator_image: "quay.io/netverify/network-validator:v0.1.197".to_owned(),
            running_poll: PollSettings {
                interval: Duration::from_secs(15),
                deadline: Duration::from_secs(2 * 60),
            },
            script_poll: PollSettings {
                interval: Duration::from_secs(30),
                deadline: Duration::from_secs(4 * 60),
            },
        }
    }
}

/// Tags applied to created cloud resources when the caller supplies none.
#[must_use]
pub fn default_tags() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("netverify".to_owned(), "owned".to_owned()),
        ("netverify-managed".to_owned(), "true".to_owned()),
        ("Name".to_owned(), "netverify-probe".to_owned()),
    ])
}

// Amazon Linux 2 (HVM), kernel 5.10, per region.
fn default_images() -> BTreeMap<String, String> {
    [
        ("us-east-1", "ami-0ed9277fb7eb570c9"),
        ("us-east-2", "ami-002068ed284fb165b"),
        ("us-west-1", "ami-03af6a70ccd8cb578"),
        ("us-west-2", "ami-00f7e5c52c0f43726"),
        ("ca-central-1", "ami-0bae7412735610274"),
        ("eu-north-1", "ami-06bfd6343550d4a29"),
        ("eu-central-1", "ami-05d34d340fb1d89e5"),
        ("eu-west-1", "ami-04dd4500af104442f"),
        ("eu-west-2", "ami-0d37e07bd4ff37148"),
        ("eu-west-3", "ami-0d3c032f5934e1b41"),
        ("eu-south-1", "ami-08d64ae428dd09b2a"),
        ("ap-northeast-1", "ami-0218d08a1f9dac831"),
        ("ap-northeast-2", "ami-0eb14fe5735c13eb5"),
        ("ap-northeast-3", "ami-0f1ffb565070e6947"),
        ("ap-east-1", "ami-026e94842bffe7c42"),
        ("ap-south-1", "ami-052cef05d01020f1d"),
        ("ap-southeast-1", "ami-0dc5785603ad4ff54"),
        ("ap-southeast-2", "ami-0bd2230cfb28832f7"),
        ("sa-east-1", "ami-0056d4296b1120bc3"),
        ("af-south-1", "ami-060867d58b989c6be"),
        ("me-south-1", "ami-0483952b6a5997b06"),
    ]
    .into_iter()
    .map(|(region, image)| (region.to_owned(), image.to_owned()))
    .collect()
}
