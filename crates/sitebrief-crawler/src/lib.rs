mod config;
mod crawler;
mod digest;
mod html;
mod keywords;
mod store;
mod strategy;

pub use config::{load_targets, CrawlConfig, MatchPolicy, PageSelectors, StoreConfig, Target};
pub use crawler::{crawl_target, run_targets};
pub use digest::{normalize_ws, summarize, DigestEntry, DigestWriter};
pub use keywords::{has_keywords, load_required_keywords};
pub use store::{FileStore, MemoryStore, VisitedStore};
pub use strategy::Strategy;

pub use anyhow;
