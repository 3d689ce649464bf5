//! CLI for the reflex archive URL scanner.

mod commands;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use reflex_core::pipeline::DEFAULT_PLACEHOLDER;
use std::path::PathBuf;

use commands::run_scan;

/// Mine archived URLs for a domain and test their parameters for reflection.
#[derive(Debug, Parser)]
#[command(name = "reflex")]
#[command(about = "reflex: harvest archived URLs and probe parameters for reflected markers", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["domain", "list"])))]
pub struct Cli {
    /// Domain name to fetch archived URLs for.
    #[arg(short = 'd', long)]
    pub domain: Option<String>,

    /// File containing domain names, one per line.
    #[arg(short = 'l', long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Print each normalized URL as it is produced.
    #[arg(short = 's', long)]
    pub stream: bool,

    /// Proxy address for archive requests (e.g. http://127.0.0.1:8080).
    #[arg(long, value_name = "ADDRESS")]
    pub proxy: Option<String>,

    /// Value substituted into every parameter and searched for in responses.
    #[arg(short = 'p', long, default_value = DEFAULT_PLACEHOLDER)]
    pub placeholder: String,

    /// Directory to save vulnerable URLs into (created if absent).
    #[arg(short = 'o', long, default_value = "xss", value_name = "DIR")]
    pub output: PathBuf,

    /// Scan workers per domain (default from config, 10).
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Use this config file instead of ~/.config/reflex/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        run_scan(self).await
    }
}

#[cfg(test)]
mod tests;
