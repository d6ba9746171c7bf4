use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;

/// One configured crawl job: a listing page plus extraction and filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Listing page enumerating links to child pages.
    pub url: String,
    /// Base URI prepended to extracted hrefs.
    pub uri: String,
    /// Maximum number of candidate links taken from one listing page.
    pub depth: usize,
    #[serde(flatten)]
    pub strategy: Strategy,
    pub page: PageSelectors,
}

/// CSS selectors locating a child page's title and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectors {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct TargetsFile {
    target: Vec<Target>,
}

/// Loads the ordered target list from a JSON file.
pub fn load_targets(path: impl AsRef<Path>) -> anyhow::Result<Vec<Target>> {
    let path = path.as_ref();
    let file = fs_err::File::open(path)?;
    let targets: TargetsFile = serde_json::from_reader(file)
        .with_context(|| format!("Invalid target list {}", path.display()))?;
    Ok(targets.target)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_keywords_file")]
    pub keywords_file: PathBuf,

    #[serde(default = "default_briefings_dir")]
    pub briefings_dir: PathBuf,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            keywords_file: default_keywords_file(),
            briefings_dir: default_briefings_dir(),
            store: StoreConfig::default(),
        }
    }
}

fn default_user_agent() -> String {
    String::from("sitebrief")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_keywords_file() -> PathBuf {
    PathBuf::from("configs/keywords.txt")
}

fn default_briefings_dir() -> PathBuf {
    PathBuf::from("briefings")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default = "default_visited_file")]
    pub visited_file: PathBuf,

    #[serde(default)]
    pub match_policy: MatchPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            visited_file: default_visited_file(),
            match_policy: MatchPolicy::default(),
        }
    }
}

fn default_visited_file() -> PathBuf {
    PathBuf::from("db/visited_urls.txt")
}

/// How a checked URL is matched against recorded entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum MatchPolicy {
    /// A URL is seen when any recorded entry is a substring of it.
    #[default]
    Substring,
    /// A URL is seen only when a recorded entry equals it.
    Exact,
}
