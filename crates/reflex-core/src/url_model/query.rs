//! Canonical URL form: default port dropped, every query value replaced.

use std::collections::HashSet;
use url::Url;

/// Canonicalizes `raw`, or returns `None` if it does not parse as a URL.
///
/// Parsing drops an explicit default port (`:80` for http, `:443` for https).
/// Each distinct query key is kept once, in first-occurrence order, with its
/// value replaced by `placeholder`; the query is form-urlencoded so `xss<>`
/// serializes as `xss%3C%3E`. A query with no pairs is removed entirely.
pub fn canonicalize(raw: &str, placeholder: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    rewrite_query(&mut url, placeholder);
    Some(url.into())
}

pub(crate) fn rewrite_query(url: &mut Url, placeholder: &str) {
    let mut seen = HashSet::new();
    let keys: Vec<String> = url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .filter(|k| seen.insert(k.clone()))
        .collect();

    if keys.is_empty() {
        url.set_query(None);
        return;
    }

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for key in &keys {
        pairs.append_pair(key, placeholder);
    }
}

/// True if `url` has at least one query parameter (scan eligibility).
pub fn has_query(url: &str) -> bool {
    match Url::parse(url) {
        Ok(u) => u.query().map_or(false, |q| !q.is_empty()),
        Err(_) => false,
    }
}
