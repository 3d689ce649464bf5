//! URL normalization and deduplication.
//!
//! Turns the raw archive listing into one canonical URL per unique
//! (endpoint, query-key set): denied extensions are dropped, default ports
//! removed and query values replaced by the placeholder.

mod path;
mod query;

pub use path::{path_extension, ExtensionDenylist};
pub use query::{canonicalize, has_query};

use std::collections::BTreeSet;
use url::Url;

/// Deduplicated canonical URLs, iterated in lexical order.
pub type UrlSet = BTreeSet<String>;

/// Normalizes raw URLs into a deduplicated set.
///
/// URLs whose path extension is denied, and strings that do not parse as
/// URLs, are skipped silently (debug log only).
pub fn normalize_urls<I, S>(raw: I, denylist: &ExtensionDenylist, placeholder: &str) -> UrlSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = UrlSet::new();
    for raw in raw {
        let raw = raw.as_ref();
        let mut url = match Url::parse(raw.trim()) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("skipping unparseable url {:?}: {}", raw, e);
                continue;
            }
        };
        if denylist.denies_path(url.path()) {
            continue;
        }
        query::rewrite_query(&mut url, placeholder);
        out.insert(url.into());
    }
    out
}
