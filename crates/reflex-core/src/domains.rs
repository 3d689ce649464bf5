//! Domain sources: a single `-d` value or a newline-separated list file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parses a domain list: one per line, trimmed and lowercased, blank lines skipped.
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Reads domains from a list file. An unreadable file is fatal.
pub fn from_list_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading domain list {}", path.display()))?;
    Ok(parse_list(&text))
}

/// A single domain given on the command line.
pub fn from_single(domain: &str) -> Result<Vec<String>> {
    let domain = domain.trim();
    if domain.is_empty() {
        anyhow::bail!("domain must not be empty");
    }
    Ok(vec![domain.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_trims_lowercases_and_skips_blank() {
        let text = "Example.COM\n\n   \n  sub.example.org  \r\nlast.net";
        assert_eq!(
            parse_list(text),
            vec!["example.com", "sub.example.org", "last.net"]
        );
    }

    #[test]
    fn list_file_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.txt");
        fs::write(&path, "A.com\n\nb.com\n").unwrap();
        assert_eq!(from_list_file(&path).unwrap(), vec!["a.com", "b.com"]);
    }

    #[test]
    fn missing_list_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(from_list_file(&dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn single_domain() {
        assert_eq!(from_single(" example.com ").unwrap(), vec!["example.com"]);
        assert!(from_single("   ").is_err());
    }
}
