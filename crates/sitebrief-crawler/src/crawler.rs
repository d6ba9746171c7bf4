use std::io::prelude::*;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::config::{CrawlConfig, Target};
use crate::digest::{summarize, DigestEntry, DigestWriter};
use crate::html;
use crate::keywords;
use crate::store::VisitedStore;

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

async fn download(config: &CrawlConfig, url: &str) -> Result<String> {
    let resp = HTTP_CLI
        .get(url)
        .header(USER_AGENT, &config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .send()
        .await?
        .error_for_status()?;

    let page = match resp.headers().get(CONTENT_TYPE) {
        Some(c) if c == "application/x-gzip" || c == "application/gzip" => {
            let compressed = resp.bytes().await?;
            let mut gz = GzDecoder::new(&compressed[..]);
            let mut page = String::new();
            gz.read_to_string(&mut page)?;
            page
        }
        _ => resp.text().await?,
    };

    Ok(page)
}

/// Crawls one target: fetches the listing page, extracts candidate links
/// with the target's strategy, then processes every unseen candidate in
/// extraction order. Transport and selector failures abort the target.
pub async fn crawl_target(
    config: &CrawlConfig,
    target: &Target,
    store: &dyn VisitedStore,
    digest: &DigestWriter,
    required_words: &[String],
) -> Result<()> {
    log::debug!("Crawling target {target:?}");

    let listing = download(config, &target.url)
        .await
        .with_context(|| format!("Couldn't fetch listing {}", target.url))?;

    let candidates = {
        let doc = html::parse(&listing);
        target.strategy.candidates(&doc, &target.uri, target.depth)?
    };
    if candidates.is_empty() {
        log::info!("No candidate links on {}", target.url);
        return Ok(());
    }

    for url in candidates {
        if !store.should_process(&url)? {
            log::debug!("Skipping already visited {url}");
            continue;
        }
        scrape_page(config, target, store, digest, required_words, &url).await?;
    }

    Ok(())
}

async fn scrape_page(
    config: &CrawlConfig,
    target: &Target,
    store: &dyn VisitedStore,
    digest: &DigestWriter,
    required_words: &[String],
    url: &str,
) -> Result<()> {
    log::info!("Scraper type: {} | URL: {url}", target.strategy.name());

    let page = download(config, url)
        .await
        .with_context(|| format!("Couldn't fetch page {url}"))?;

    let (title, content) = {
        let doc = html::parse(&page);
        let title = html::select_first(&doc, &target.page.title)?
            .ok_or_else(|| anyhow!("No element matches {:?} on {url}", target.page.title))?;
        let content = html::select_first(&doc, &target.page.content)?
            .ok_or_else(|| anyhow!("No element matches {:?} on {url}", target.page.content))?;
        (html::text(title), html::text(content))
    };

    // Pages that fail the keyword filter still count as visited.
    store.record(url)?;

    let (passed, required) = keywords::has_keywords(&content, required_words)?;
    if !passed {
        log::info!("Ignoring {url}, none of the required words {required:?} found");
        return Ok(());
    }

    digest.append(&DigestEntry {
        title,
        url: url.to_string(),
        summary: summarize(&content),
    })?;

    Ok(())
}

/// Runs every target in order. A failed target doesn't prevent the
/// following ones from running, but any failure makes the whole run fail.
pub async fn run_targets(
    config: &CrawlConfig,
    targets: &[Target],
    store: &dyn VisitedStore,
    digest: &DigestWriter,
) -> Result<()> {
    let required_words = keywords::load_required_keywords(&config.keywords_file)?;

    let mut failed = 0;
    for target in targets {
        if let Err(e) = crawl_target(config, target, store, digest, &required_words).await {
            log::error!("Target {} failed: {e:#}", target.url);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed}/{} targets failed", targets.len());
    }
    Ok(())
}
