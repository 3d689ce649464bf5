//! Persisted scan output: one `{domain}.txt` per domain under the output directory.

mod sanitize;

pub use sanitize::sanitize_file_stem;

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Stem used when a domain sanitizes to nothing.
const FALLBACK_STEM: &str = "domain";

/// Creates the output directory (and parents) if absent.
pub fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))
}

/// File name for a domain's results, e.g. `example.com.txt`.
pub fn domain_file_name(domain: &str) -> String {
    let stem = sanitize_file_stem(domain.trim());
    if stem.is_empty() {
        format!("{}.txt", FALLBACK_STEM)
    } else {
        format!("{}.txt", stem)
    }
}

pub fn domain_file_path(dir: &Path, domain: &str) -> PathBuf {
    dir.join(domain_file_name(domain))
}

/// Creates (truncating) the result file for `domain`. The returned handle is
/// the scan sink; dropping it closes the file.
pub fn create_domain_file(dir: &Path, domain: &str) -> Result<(File, PathBuf)> {
    let path = domain_file_path(dir, domain);
    let file =
        File::create(&path).with_context(|| format!("creating result file {}", path.display()))?;
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_name_from_domain() {
        assert_eq!(domain_file_name("example.com"), "example.com.txt");
        assert_eq!(domain_file_name(" example.com "), "example.com.txt");
        assert_eq!(domain_file_name(".."), "domain.txt");
    }

    #[test]
    fn prepare_dir_creates_nested() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("xss").join("nested");
        assert!(!dir.exists());
        prepare_dir(&dir).unwrap();
        assert!(dir.is_dir());
        prepare_dir(&dir).unwrap();
    }

    #[test]
    fn create_domain_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let (mut f, path) = create_domain_file(dir.path(), "example.com").unwrap();
        writeln!(f, "http://example.com/old?id=1").unwrap();
        drop(f);
        let (f, path2) = create_domain_file(dir.path(), "example.com").unwrap();
        drop(f);
        assert_eq!(path, path2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
