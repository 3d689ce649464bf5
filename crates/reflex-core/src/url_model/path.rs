//! File extension extraction from URL paths.

use std::collections::HashSet;

/// Lowercase extension (with leading dot) of the last segment of `path`.
///
/// Leading dots of the segment are not an extension separator, so
/// `/.htaccess` yields `None` while `/a/Logo.PNG` yields `Some(".png")`.
pub fn path_extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let stem = segment.trim_start_matches('.');
    let dot = stem.rfind('.')?;
    let ext = &stem[dot..];
    if ext.len() <= 1 {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Set of extensions whose URLs are dropped during normalization.
/// Entries are stored lowercase with a leading dot.
#[derive(Debug, Clone, Default)]
pub struct ExtensionDenylist {
    extensions: HashSet<String>,
}

impl ExtensionDenylist {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty() && e != ".")
            .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
            .collect();
        Self { extensions }
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// True if the extension of `path` is denied.
    pub fn denies_path(&self, path: &str) -> bool {
        match path_extension(path) {
            Some(ext) => self.extensions.contains(&ext),
            None => false,
        }
    }
}
