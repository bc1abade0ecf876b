//! Boot-script generation.
//!
//! Renders the probe instance's startup payload from a fixed template and a
//! substitution map, then encodes it for transport as instance boot
//! metadata. Rendering is a pure function of [`BootScriptParams`] — no
//! randomness, no environment coupling — so fixtures are reproducible.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::{Captures, Regex};

use crate::domain::console::{
    SCRIPT_BEGIN_SENTINEL, SCRIPT_END_SENTINEL, VALIDATOR_BEGIN_SENTINEL, VALIDATOR_END_SENTINEL,
};
use crate::domain::probe::ProxyConfig;

/// The startup script run by the probe instance.
///
/// `${NAME}` placeholders are substituted before the script ever reaches a
/// shell. The begin/end sentinels are load-bearing: the console classifier
/// searches for the end sentinel verbatim to detect script completion.
const TEMPLATE: &str = r#"#!/bin/bash
echo "${USERDATA_BEGIN}"

if [ -n "${HTTP_PROXY}" ]; then
    export HTTP_PROXY="${HTTP_PROXY}"
    export http_proxy="${HTTP_PROXY}"
fi
if [ -n "${HTTPS_PROXY}" ]; then
    export HTTPS_PROXY="${HTTPS_PROXY}"
    export https_proxy="${HTTPS_PROXY}"
fi
if [ -n "${CACERT}" ]; then
    echo "${CACERT}" | base64 --decode > /tmp/cacert.pem
    export CURL_CA_BUNDLE=/tmp/cacert.pem
fi

sudo amazon-linux-extras install -y docker
sudo systemctl start docker
sudo docker pull "${VALIDATOR_IMAGE}"

echo "${VALIDATOR_START}"
sudo docker run \
    --env "AWS_REGION=${AWS_REGION}" \
    --env "NOTLS=${NOTLS}" \
    "${VALIDATOR_IMAGE}" --timeout="${TIMEOUT}"
echo "${VALIDATOR_END}"

echo "${USERDATA_END}"
"#;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_]+)\}").expect("valid regex"));

/// Named substitution variables for one boot-script rendering.
#[derive(Debug)]
pub struct BootScriptParams<'a> {
    pub region: &'a str,
    /// Image reference of the validator artifact run inside the probe.
    pub validator_image: &'a str,
    /// Timeout for each individual egress request made by the validator.
    pub timeout: Duration,
    pub proxy: &'a ProxyConfig,
}

fn substitutions(params: &BootScriptParams<'_>) -> BTreeMap<&'static str, String> {
    let proxy = params.proxy;
    BTreeMap::from([
        ("USERDATA_BEGIN", SCRIPT_BEGIN_SENTINEL.to_owned()),
        ("USERDATA_END", SCRIPT_END_SENTINEL.to_owned()),
        ("VALIDATOR_START", VALIDATOR_BEGIN_SENTINEL.to_owned()),
        ("VALIDATOR_END", VALIDATOR_END_SENTINEL.to_owned()),
        ("VALIDATOR_IMAGE", params.validator_image.to_owned()),
        ("AWS_REGION", params.region.to_owned()),
        ("TIMEOUT", format!("{}s", params.timeout.as_secs())),
        ("HTTP_PROXY", proxy.http_proxy.clone().unwrap_or_default()),
        ("HTTPS_PROXY", proxy.https_proxy.clone().unwrap_or_default()),
        (
            "CACERT",
            proxy
                .ca_bundle
                .as_deref()
                .map(|pem| BASE64.encode(pem.as_bytes()))
                .unwrap_or_default(),
        ),
        ("NOTLS", proxy.no_tls.to_string()),
    ])
}

/// Render the template with the given parameters. Unknown placeholders
/// expand to the empty string.
#[must_use]
pub fn render(params: &BootScriptParams<'_>) -> String {
    let vars = substitutions(params);
    PLACEHOLDER_RE
        .replace_all(TEMPLATE, |caps: &Captures<'_>| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Render and base64-encode the boot script for instance creation.
#[must_use]
pub fn generate(params: &BootScriptParams<'_>) -> String {
    BASE64.encode(render(params).as_bytes())
}
