use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WS_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapses whitespace runs (newlines included) into single spaces and
/// trims the ends.
pub fn normalize_ws(s: &str) -> String {
    WS_RUN.replace_all(s, " ").trim().to_string()
}

/// Shortens page content to a 300 character excerpt. Shorter input is
/// returned unchanged.
pub fn summarize(text: &str) -> String {
    text.chars().take(300).collect()
}

/// One qualifying page, ready to be appended to the day's briefing.
#[derive(Debug, Clone)]
pub struct DigestEntry {
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// Appends entries to a date-stamped markdown briefing, one document per
/// calendar day. The document gets a header block on its first entry and is
/// never rewritten.
#[derive(Debug, Clone)]
pub struct DigestWriter {
    base_dir: PathBuf,
}

impl DigestWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn append(&self, entry: &DigestEntry) -> Result<()> {
        self.append_at(Local::now(), entry)
    }

    fn append_at(&self, now: DateTime<Local>, entry: &DigestEntry) -> Result<()> {
        fs_err::create_dir_all(&self.base_dir)?;
        let path = self
            .base_dir
            .join(format!("{}-briefing.md", now.format("%Y-%m-%d")));
        let new_document = !path.exists();

        let mut file = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        if new_document {
            write!(
                file,
                "# Daily Briefing\n\n*Generated: {}*\n\n---\n\n",
                now.format("%d/%m/%Y %H:%M")
            )?;
        }
        write!(
            file,
            "## {}\n**URL:** {}\n\n**Summary:** {}\n\n---\n",
            normalize_ws(&entry.title),
            normalize_ws(&entry.url),
            normalize_ws(&entry.summary),
        )?;
        Ok(())
    }
}
