use crate::models::ScanSettings;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::fs;
use std::io;
use thiserror::Error;
use tokio::sync::watch;
use walkdir::{DirEntry, WalkDir};

/// Errors that end a scan. Per-entry problems below the root are not errors;
/// they are logged and skipped.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(Utf8PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Scan cancelled")]
    Cancelled,
}

impl ScanError {
    fn from_io(path: &Utf8Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Enumerates media files under a root directory.
///
/// Matching is by extension only, case-insensitive. Results are sorted by
/// their string form and deduplicated so repeated scans of the same tree
/// always produce the same ordering.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    extensions: HashSet<String>,
    recursive: bool,
    skip_hidden: bool,
}

impl DirectoryScanner {
    /// Create a recursive scanner that skips hidden entries.
    ///
    /// Extensions may be given with or without a leading dot, in any case.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
            recursive: true,
            skip_hidden: true,
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Self {
        Self::new(settings.allowed_extensions())
            .recursive(settings.recursive)
            .skip_hidden(settings.skip_hidden)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Whether a file path passes the extension allow-list.
    pub fn accepts(&self, path: &Utf8Path) -> bool {
        path.extension()
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Scan `root` on the calling thread.
    ///
    /// Blocks on filesystem I/O; call it from `spawn_blocking` (or use
    /// [`scan_async`](Self::scan_async)). `cancel` is checked between entries.
    pub fn scan(
        &self,
        root: &Utf8Path,
        cancel: &watch::Receiver<bool>,
    ) -> Result<Vec<Utf8PathBuf>, ScanError> {
        check_root(root)?;

        tracing::debug!(
            "Scanning {} (recursive={}, skip_hidden={}, extensions={:?})",
            root,
            self.recursive,
            self.skip_hidden,
            self.extensions
        );

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let skip_hidden = self.skip_hidden;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(move |entry| entry.depth() == 0 || !(skip_hidden && is_hidden(entry)));

        let mut found = Vec::new();

        for entry in walker {
            if *cancel.borrow() {
                tracing::debug!("Scan of {} cancelled after {} files", root, found.len());
                return Err(ScanError::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(raw) => {
                    tracing::debug!("Skipping non UTF-8 path: {}", raw.display());
                    continue;
                }
            };

            if self.accepts(&path) {
                found.push(path);
            }
        }

        found.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        found.dedup();

        tracing::info!("Scan of {} found {} files", root, found.len());
        Ok(found)
    }

    /// Run [`scan`](Self::scan) on tokio's blocking pool.
    pub async fn scan_async(
        self,
        root: Utf8PathBuf,
        cancel: watch::Receiver<bool>,
    ) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let join_root = root.clone();
        tokio::task::spawn_blocking(move || self.scan(&root, &cancel))
            .await
            .map_err(|e| ScanError::Io {
                path: join_root,
                source: io::Error::other(e.to_string()),
            })?
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn check_root(root: &Utf8Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    // Surface an unreadable root now instead of as a silently empty result.
    fs::read_dir(root).map_err(|e| ScanError::from_io(root, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_cancel() -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(false);
        // Receiver keeps the last value even after the sender is gone
        drop(tx);
        rx
    }

    fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_extension_normalization() {
        let scanner = DirectoryScanner::new([".PNG", "jpg", " .Jpeg "]);

        assert!(scanner.accepts(Utf8Path::new("/a/b.png")));
        assert!(scanner.accepts(Utf8Path::new("/a/b.JPG")));
        assert!(scanner.accepts(Utf8Path::new("/a/b.jpeg")));
        assert!(!scanner.accepts(Utf8Path::new("/a/b.txt")));
        assert!(!scanner.accepts(Utf8Path::new("/a/png")));
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = utf8_root(&dir).join("nope");

        let result = DirectoryScanner::new(["png"]).scan(&missing, &no_cancel());
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    fn test_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = utf8_root(&dir).join("a.png");
        fs::write(&file, b"x").unwrap();

        let result = DirectoryScanner::new(["png"]).scan(&file, &no_cancel());
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = DirectoryScanner::new(["png"]).scan(&utf8_root(&dir), &rx);
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[test]
    fn test_sorted_by_string() {
        let dir = TempDir::new().unwrap();
        for name in ["b.png", "a.png", "C.png", "a0.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let found = DirectoryScanner::new(["png"])
            .scan(&utf8_root(&dir), &no_cancel())
            .unwrap();
        let names: Vec<&str> = found.iter().filter_map(|p| p.file_name()).collect();

        assert_eq!(names, vec!["C.png", "a.png", "a0.png", "b.png"]);
    }
}
