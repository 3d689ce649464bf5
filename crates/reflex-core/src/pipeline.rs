//! Per-domain harvest → normalize → scan pipeline.
//!
//! Domains are processed strictly one after another; within a domain the
//! scan runs on the worker pool in `scanner`.

use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::ReflexConfig;
use crate::fetch::Fetcher;
use crate::harvest;
use crate::output;
use crate::scanner::{self, ProgressReporter, ScanReport};
use crate::url_model::{self, ExtensionDenylist};

/// Default placeholder, also used as the reflection marker.
pub const DEFAULT_PLACEHOLDER: &str = "xss<>";

/// User-selected options for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory receiving `{domain}.txt` result files.
    pub output_dir: PathBuf,
    /// Replaces every query value and is searched for in response bodies.
    pub placeholder: String,
    /// Proxy for archive queries only.
    pub proxy: Option<String>,
    /// Print each normalized URL as it is produced.
    pub stream: bool,
    /// Scan workers per domain.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("xss"),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            proxy: None,
            stream: false,
            concurrency: 10,
        }
    }
}

/// What happened for one domain.
#[derive(Debug, Clone)]
pub struct DomainReport {
    pub domain: String,
    pub harvested: usize,
    pub normalized: usize,
    pub output_path: PathBuf,
    pub scan: ScanReport,
}

/// Aggregate over all domains of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub domains: Vec<DomainReport>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Every vulnerable URL found, grouped by domain in processing order.
    pub fn vulnerable(&self) -> impl Iterator<Item = &str> {
        self.domains
            .iter()
            .flat_map(|d| d.scan.vulnerable.iter().map(String::as_str))
    }

    pub fn vulnerable_count(&self) -> usize {
        self.domains.iter().map(|d| d.scan.vulnerable.len()).sum()
    }
}

pub struct Pipeline {
    harvester: Fetcher,
    prober: Fetcher,
    endpoint: String,
    denylist: ExtensionDenylist,
    opts: RunOptions,
}

impl Pipeline {
    /// Builds the harvest fetcher (proxied, retrying) and the probe fetcher
    /// (direct, single attempt) from config.
    pub fn new(cfg: &ReflexConfig, opts: RunOptions) -> Result<Self> {
        cfg.validate()?;
        if opts.placeholder.is_empty() {
            anyhow::bail!("placeholder must not be empty");
        }
        let harvester = Fetcher::from_config(cfg, opts.proxy.clone())?;
        let prober = harvester.direct_single_attempt();
        Ok(Self {
            harvester,
            prober,
            endpoint: cfg.archive_endpoint.clone(),
            denylist: ExtensionDenylist::new(&cfg.denied_extensions),
            opts,
        })
    }

    pub fn options(&self) -> &RunOptions {
        &self.opts
    }

    /// Harvests, normalizes and scans one domain, writing its result file.
    pub fn run_domain<R>(&self, domain: &str, reporter: &R) -> Result<DomainReport>
    where
        R: ProgressReporter + ?Sized,
    {
        let (mut file, output_path) = output::create_domain_file(&self.opts.output_dir, domain)?;

        let raw = harvest::harvest(&self.harvester, &self.endpoint, domain);
        let harvested = raw.len();
        let urls = url_model::normalize_urls(&raw, &self.denylist, &self.opts.placeholder);
        tracing::info!(domain, "cleaned URLs: {}", urls.len());

        if self.opts.stream {
            for url in &urls {
                println!("{}", url);
            }
        }

        let scan = if urls.is_empty() {
            tracing::info!(domain, "no URLs to scan");
            ScanReport::default()
        } else {
            scanner::scan(
                urls.iter().cloned(),
                &mut file,
                &self.opts.placeholder,
                self.opts.concurrency,
                &self.prober,
                reporter,
            )
        };

        Ok(DomainReport {
            domain: domain.to_string(),
            harvested,
            normalized: urls.len(),
            output_path,
            scan,
        })
    }

    /// Runs every domain in order. Fails only on local I/O errors (output
    /// directory or result file); network failures just yield fewer results.
    pub fn run<R>(&self, domains: &[String], reporter: &R) -> Result<RunSummary>
    where
        R: ProgressReporter + ?Sized,
    {
        let start = Instant::now();
        output::prepare_dir(&self.opts.output_dir)?;

        let mut summary = RunSummary::default();
        for domain in domains {
            let report = self.run_domain(domain, reporter)?;
            tracing::debug!(
                domain = %report.domain,
                harvested = report.harvested,
                normalized = report.normalized,
                vulnerable = report.scan.vulnerable.len(),
                "domain finished"
            );
            summary.domains.push(report);
        }
        summary.elapsed = start.elapsed();
        Ok(summary)
    }
}
