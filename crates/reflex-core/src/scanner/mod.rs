//! Reflected-marker scan over normalized URLs.
//!
//! A fixed pool of scoped worker threads drains a queue that is filled
//! before any worker starts. One lock guards the vulnerable set, the
//! processed counter and the output sink; it is never held across a fetch.

mod progress;
mod state;

pub use progress::{ProgressReporter, ScanProgress, SilentReporter, TerminalReporter};
pub use state::{ScanOutcome, VulnerableSet};

use std::collections::VecDeque;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::fetch::Probe;
use crate::url_model::has_query;

/// Totals for one scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Eligible (parameterized) URLs queued.
    pub total: usize,
    /// Tasks finished, whatever the outcome. Equals `total` after `scan` returns.
    pub processed: usize,
    /// Tasks that ended in a fetch error.
    pub errors: usize,
    /// Worker threads started.
    pub workers: usize,
    /// URLs that reflected the marker, in discovery order, without duplicates.
    pub vulnerable: Vec<String>,
}

struct Shared<'s, W> {
    vulnerable: VulnerableSet,
    processed: usize,
    errors: usize,
    sink: &'s mut W,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Classifies a probe result against `marker`.
pub fn classify_body(body: &str, marker: &str) -> ScanOutcome {
    if body.contains(marker) {
        ScanOutcome::Vulnerable
    } else {
        ScanOutcome::NotVulnerable
    }
}

/// Probes every URL that has a query string and records the ones whose body
/// contains `marker`.
///
/// URLs without query parameters are discarded up front and not counted.
/// `min(concurrency, eligible)` workers are started; each vulnerable URL is
/// written once, newline-terminated, to `sink`. Returns after every task is
/// processed and every worker has exited.
pub fn scan<I, S, W, P, R>(
    urls: I,
    sink: &mut W,
    marker: &str,
    concurrency: usize,
    probe: &P,
    reporter: &R,
) -> ScanReport
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    W: Write + Send,
    P: Probe + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let queue: VecDeque<String> = urls
        .into_iter()
        .map(Into::into)
        .filter(|u| has_query(u))
        .collect();
    let total = queue.len();
    if total == 0 {
        tracing::info!("no URLs with parameters to scan");
        return ScanReport::default();
    }

    let workers = concurrency.max(1).min(total);
    tracing::info!(
        workers,
        "starting scan on {} URLs with query parameters",
        total
    );

    let queue = Mutex::new(queue);
    let shared = Mutex::new(Shared {
        vulnerable: VulnerableSet::new(),
        processed: 0,
        errors: 0,
        sink,
    });

    std::thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let Some(url) = lock(&queue).pop_front() else {
                    break;
                };
                let outcome = probe_one(probe, &url, marker);

                let mut st = lock(&shared);
                match outcome {
                    ScanOutcome::Vulnerable => {
                        if st.vulnerable.insert_new(&url) {
                            if let Err(e) = writeln!(st.sink, "{}", url).and_then(|_| st.sink.flush())
                            {
                                tracing::error!("failed to record {}: {}", url, e);
                            }
                        }
                    }
                    ScanOutcome::FetchError => st.errors += 1,
                    ScanOutcome::NotVulnerable => {}
                }
                st.processed += 1;
                reporter.outcome(&url, outcome);
                reporter.report(ScanProgress {
                    processed: st.processed,
                    total,
                });
            });
        }
    });

    let st = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
    tracing::info!(
        vulnerable = st.vulnerable.len(),
        errors = st.errors,
        "scanning complete, processed {} URLs",
        st.processed
    );
    ScanReport {
        total,
        processed: st.processed,
        errors: st.errors,
        workers,
        vulnerable: st.vulnerable.into_vec(),
    }
}

/// One fetch, no retry. A panicking probe counts as a fetch error so the
/// task is still accounted for.
fn probe_one<P: Probe + ?Sized>(probe: &P, url: &str, marker: &str) -> ScanOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| probe.probe(url))) {
        Ok(Ok(body)) => classify_body(&body, marker),
        Ok(Err(e)) => {
            tracing::warn!("error scanning {}: {}", url, e);
            ScanOutcome::FetchError
        }
        Err(_) => {
            tracing::error!("probe panicked while scanning {}", url);
            ScanOutcome::FetchError
        }
    }
}
