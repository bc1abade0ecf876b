//! Command implementations

pub mod dns;
pub mod egress;

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};

use crate::application::config;
use crate::domain::report::RunOutput;
use crate::output::OutputContext;

/// Resolve the region from the flag, the environment, or the default.
pub(crate) fn resolve_region(flag: Option<&str>) -> String {
    flag.map(str::to_owned)
        .or_else(|| std::env::var(config::REGION_ENV_VAR).ok())
        .unwrap_or_else(|| config::DEFAULT_REGION.to_owned())
}

/// Parse repeated `key=value` tag flags; an empty list yields the default
/// managed-resource tag set.
pub(crate) fn parse_tags(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    if pairs.is_empty() {
        return Ok(config::default_tags());
    }
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .ok_or_else(|| anyhow!("invalid tag {pair:?}: expected key=value"))
        })
        .collect()
}

/// Print the report (styled or JSON) and turn an unsuccessful run into a
/// non-zero exit.
pub(crate) fn report(ctx: &OutputContext, output: &RunOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&output.to_json())?);
    } else {
        ctx.print_summary(output);
    }
    anyhow::ensure!(output.is_successful(), "network verification failed");
    Ok(())
}
