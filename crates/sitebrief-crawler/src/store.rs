use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;

use crate::config::{MatchPolicy, StoreConfig};

/// Tracks which URLs have already been processed across runs.
///
/// The backing store is pluggable; every backend must answer the same way
/// for the same sequence of calls.
pub trait VisitedStore {
    /// True when `url` has not been seen yet. A missing backing store means
    /// nothing was seen, so this fails open toward processing.
    fn should_process(&self, url: &str) -> Result<bool>;

    /// Durably marks `url` as seen, creating any missing backing structure.
    fn record(&self, url: &str) -> Result<()>;
}

/// Line-oriented append-only file of seen URLs.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    policy: MatchPolicy,
}

impl FileStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: config.visited_file.clone(),
            policy: config.match_policy,
        }
    }
}

impl VisitedStore for FileStore {
    fn should_process(&self, url: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(true);
        }
        let recorded = fs_err::read_to_string(&self.path)?;
        let seen = recorded
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .any(|line| self.policy.matches(line, url));
        Ok(!seen)
    }

    fn record(&self, url: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs_err::create_dir_all(dir)?;
        }
        let mut file = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{url}")?;
        Ok(())
    }
}

/// In-process store, used as a drop-in backend when persistence across runs
/// is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    policy: MatchPolicy,
    seen: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl VisitedStore for MemoryStore {
    fn should_process(&self, url: &str) -> Result<bool> {
        let seen = self.seen.lock().unwrap();
        Ok(!seen.iter().any(|line| self.policy.matches(line, url)))
    }

    fn record(&self, url: &str) -> Result<()> {
        self.seen.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

impl MatchPolicy {
    fn matches(&self, recorded: &str, url: &str) -> bool {
        match self {
            Self::Substring => url.contains(recorded),
            Self::Exact => recorded == url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_store(dir: &tempfile::TempDir, policy: MatchPolicy) -> FileStore {
        FileStore::new(&StoreConfig {
            visited_file: dir.path().join("db").join("visited.txt"),
            match_policy: policy,
        })
    }

    #[test]
    fn fresh_store_processes_anything() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, MatchPolicy::Substring);
        assert!(store.should_process("http://example.com/new-page").unwrap());
    }

    #[test]
    fn record_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, MatchPolicy::Substring);
        store.record("http://example.com/existing-page").unwrap();
        assert!(!store
            .should_process("http://example.com/existing-page")
            .unwrap());
        assert!(store.should_process("http://example.com/other").unwrap());
    }

    #[test]
    fn record_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, MatchPolicy::Substring);
        store.record("http://example.com/a").unwrap();
        let written = fs_err::read_to_string(dir.path().join("db").join("visited.txt")).unwrap();
        assert_eq!(written, "http://example.com/a\n");
    }

    #[test]
    fn substring_entry_suppresses_longer_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, MatchPolicy::Substring);
        store.record("example.com").unwrap();
        assert!(!store
            .should_process("http://example.com/very/long/path")
            .unwrap());
    }

    #[test]
    fn exact_policy_requires_full_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, MatchPolicy::Exact);
        store.record("example.com").unwrap();
        assert!(store
            .should_process("http://example.com/very/long/path")
            .unwrap());
        assert!(!store.should_process("example.com").unwrap());
    }

    #[test]
    fn empty_file_processes_anything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visited.txt");
        fs_err::write(&path, "").unwrap();
        let store = FileStore::new(&StoreConfig {
            visited_file: path,
            match_policy: MatchPolicy::Substring,
        });
        assert!(store.should_process("http://example.com/new-page").unwrap());
    }

    #[test]
    fn appends_preserve_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, MatchPolicy::Substring);
        store.record("http://example.com/first").unwrap();
        store.record("http://example.com/second").unwrap();
        let written = fs_err::read_to_string(dir.path().join("db").join("visited.txt")).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(
            lines,
            vec!["http://example.com/first", "http://example.com/second"]
        );
    }

    #[test]
    fn memory_store_behaves_like_file_store() {
        let store = MemoryStore::new(MatchPolicy::Substring);
        assert!(store.should_process("http://example.com/x").unwrap());
        store.record("example.com").unwrap();
        assert!(!store.should_process("http://example.com/x").unwrap());
    }
}
