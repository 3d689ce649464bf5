//! Historical URL discovery through the web archive's CDX index.

use crate::fetch::Fetcher;

/// Builds the archive index query for `domain`: plain-text output, collapsed
/// by URL key, only the `original` field.
pub fn archive_query_url(endpoint: &str, domain: &str) -> String {
    format!(
        "{}?url={}/*&output=txt&collapse=urlkey&fl=original&page=/",
        endpoint.trim_end_matches('?'),
        domain.trim()
    )
}

/// Splits an index response body into raw URLs.
pub fn parse_listing(body: &str) -> Vec<String> {
    body.split_whitespace().map(str::to_string).collect()
}

/// Queries the archive for every known URL under `domain`.
///
/// The request goes through `fetcher` (and its proxy and retry policy). When
/// every attempt fails the domain simply yields no URLs.
pub fn harvest(fetcher: &Fetcher, endpoint: &str, domain: &str) -> Vec<String> {
    let query = archive_query_url(endpoint, domain);
    tracing::info!(domain, "fetching archived URLs");
    match fetcher.fetch(&query) {
        Ok(resp) => {
            let urls = parse_listing(&resp.text());
            tracing::info!(domain, "found {} URLs", urls.len());
            urls
        }
        Err(e) => {
            tracing::error!(
                domain,
                "failed to fetch {} after {} attempts: {}",
                query,
                fetcher.retry_policy().max_attempts,
                e
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_matches_archive_format() {
        assert_eq!(
            archive_query_url("https://web.archive.org/cdx/search/cdx", "example.com"),
            "https://web.archive.org/cdx/search/cdx?url=example.com/*&output=txt&collapse=urlkey&fl=original&page=/"
        );
    }

    #[test]
    fn listing_split_on_any_whitespace() {
        let body = "http://a.com/x?id=1\nhttp://a.com/y\r\n\n  http://a.com/z\t";
        assert_eq!(
            parse_listing(body),
            vec!["http://a.com/x?id=1", "http://a.com/y", "http://a.com/z"]
        );
        assert!(parse_listing(" \n ").is_empty());
    }
}
