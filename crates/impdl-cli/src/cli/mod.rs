//! CLI for the impdl download handler.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use impdl_core::config;
use std::path::PathBuf;

use commands::{run_config, run_fetch, run_profiles, FetchArgs};

/// Top-level CLI for impdl.
#[derive(Debug, Parser)]
#[command(name = "impdl")]
#[command(about = "impdl: fetch URLs while impersonating a browser's TLS/HTTP fingerprint", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one URL through the handler and print the body.
    Fetch {
        /// HTTP/HTTPS URL to fetch.
        url: String,

        /// Browser profile to impersonate (default: the configured profile).
        #[arg(long, value_name = "PROFILE", conflicts_with = "no_impersonate")]
        impersonate: Option<String>,

        /// Use the plain download path without a browser fingerprint.
        #[arg(long)]
        no_impersonate: bool,

        /// Request method.
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Extra request header, `Name: value`. Repeatable.
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Request body.
        #[arg(short = 'd', long)]
        data: Option<String>,

        /// Cookie, `name=value`. Repeatable.
        #[arg(short = 'b', long = "cookie", value_name = "COOKIE")]
        cookies: Vec<String>,

        /// Proxy URL for this request.
        #[arg(long)]
        proxy: Option<String>,

        /// Skip TLS certificate and host name verification.
        #[arg(short = 'k', long)]
        insecure: bool,

        /// Timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<f64>,

        /// Print the status line and response headers before the body.
        #[arg(short = 'i', long)]
        include: bool,

        /// Write the body to this file instead of stdout.
        #[arg(short = 'o', long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// List the supported impersonation profiles.
    Profiles,

    /// Show the configuration file location and effective values.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let (cfg, path) = match &cli.config_file {
            Some(path) => (config::load_from(path)?, path.clone()),
            None => (config::load_or_init()?, config::config_path()?),
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                url,
                impersonate,
                no_impersonate,
                method,
                headers,
                data,
                cookies,
                proxy,
                insecure,
                timeout,
                include,
                output,
            } => {
                let args = FetchArgs {
                    url,
                    impersonate,
                    no_impersonate,
                    method,
                    headers,
                    data,
                    cookies,
                    proxy,
                    insecure,
                    timeout,
                    include,
                    output,
                };
                run_fetch(&cfg, args).await?;
            }
            CliCommand::Profiles => run_profiles(&cfg),
            CliCommand::Config => run_config(&cfg, &path),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
