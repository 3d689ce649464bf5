//! `reflex -d <domain>` / `reflex -l <file>` – harvest and scan.

use anyhow::{Context, Result};
use reflex_core::config;
use reflex_core::domains;
use reflex_core::pipeline::{Pipeline, RunOptions, RunSummary};
use reflex_core::scanner::TerminalReporter;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::cli::Cli;

fn format_summary(summary: &RunSummary, elapsed: Duration) -> String {
    let mut out = String::new();
    if summary.vulnerable_count() > 0 {
        let _ = writeln!(out, "\nVulnerable URL(s) found:");
        for url in summary.vulnerable() {
            let _ = writeln!(out, "{}", url);
        }
    } else {
        let _ = writeln!(out, "\nNo vulnerable URLs found.");
    }
    let _ = writeln!(out, "\nTime elapsed: {:.2} seconds", elapsed.as_secs_f64());
    out
}

pub async fn run_scan(cli: Cli) -> Result<()> {
    let start = Instant::now();

    let cfg = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);

    let domains = match (&cli.domain, &cli.list) {
        (Some(domain), _) => domains::from_single(domain)?,
        (None, Some(list)) => domains::from_list_file(list)?,
        (None, None) => anyhow::bail!("provide either --domain or --list"),
    };
    if domains.is_empty() {
        anyhow::bail!("no domains to scan");
    }

    let concurrency = cli.threads.unwrap_or(cfg.concurrency);
    if concurrency == 0 {
        anyhow::bail!("--threads must be at least 1");
    }

    let opts = RunOptions {
        output_dir: cli.output,
        placeholder: cli.placeholder,
        proxy: cli.proxy,
        stream: cli.stream,
        concurrency,
    };
    let pipeline = Pipeline::new(&cfg, opts)?;

    let summary = tokio::task::spawn_blocking(move || {
        let reporter = TerminalReporter::stdout();
        pipeline.run(&domains, &reporter)
    })
    .await
    .context("scan task join")??;

    tracing::info!(
        domains = summary.domains.len(),
        vulnerable = summary.vulnerable_count(),
        "run complete"
    );
    print!("{}", format_summary(&summary, start.elapsed()));
    Ok(())
}
