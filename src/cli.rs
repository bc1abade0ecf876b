//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Egress and DNS verification for managed-cluster networks
#[derive(Parser)]
#[command(
    name = "netverify",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output the verification report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable additional debug-level logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify essential cluster endpoints are reachable from a subnet
    Egress(commands::egress::EgressArgs),

    /// Verify DNS attributes of a VPC
    Dns(commands::dns::DnsArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or verification did not pass.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Egress(args) => commands::egress::run(&ctx, args, json).await,
            Command::Dns(args) => commands::dns::run(&ctx, args, json).await,
        }
    }
}
