use anyhow::{anyhow, Result};
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::html;

/// How candidate child-page links are located on a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Strategy {
    /// Anchors matching `child_anchor` under an element matching
    /// `parent_container`.
    ParentChildList {
        parent_container: String,
        child_anchor: String,
    },
    /// Anchors matching `anchor_selector` anywhere on the page.
    SelectorAnchorList { anchor_selector: String },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParentChildList { .. } => "parent-child-list",
            Self::SelectorAnchorList { .. } => "selector-anchor-list",
        }
    }

    fn anchor_selector(&self) -> String {
        match self {
            Self::ParentChildList {
                parent_container,
                child_anchor,
            } => format!("{parent_container} {child_anchor}"),
            Self::SelectorAnchorList { anchor_selector } => anchor_selector.clone(),
        }
    }

    /// Extracts up to `depth` candidate URLs from a listing page, in document
    /// order. Hrefs are expected to be absolute paths and are resolved by
    /// prepending `uri`.
    pub fn candidates(&self, listing: &Html, uri: &str, depth: usize) -> Result<Vec<String>> {
        let selector = self.anchor_selector();
        html::select_all(listing, &selector, depth)?
            .into_iter()
            .map(|anchor| {
                let href = html::href(anchor)
                    .ok_or_else(|| anyhow!("Anchor matched by {selector:?} has no href"))?;
                Ok(format!("{uri}{href}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
        <div class="news">
            <a class="headline" href="/post/1">First</a>
            <a class="headline" href="/post/2">Second</a>
            <a class="headline" href="/post/3">Third</a>
        </div>
        <a class="headline" href="/outside">Outside the container</a>
    </body></html>"#;

    #[test]
    fn parent_child_scopes_to_container() {
        let doc = html::parse(LISTING);
        let strategy = Strategy::ParentChildList {
            parent_container: "div.news".into(),
            child_anchor: "a.headline".into(),
        };
        let urls = strategy.candidates(&doc, "http://example.com", 10).unwrap();
        assert_eq!(
            urls,
            vec![
                "http://example.com/post/1",
                "http://example.com/post/2",
                "http://example.com/post/3",
            ]
        );
    }

    #[test]
    fn parent_child_honors_depth() {
        let doc = html::parse(LISTING);
        let strategy = Strategy::ParentChildList {
            parent_container: "div.news".into(),
            child_anchor: "a.headline".into(),
        };
        let urls = strategy.candidates(&doc, "http://example.com", 2).unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn selector_anchor_matches_anywhere() {
        let doc = html::parse(LISTING);
        let strategy = Strategy::SelectorAnchorList {
            anchor_selector: "a.headline".into(),
        };
        let urls = strategy.candidates(&doc, "http://example.com", 10).unwrap();
        assert_eq!(urls.len(), 4);
        assert_eq!(urls[3], "http://example.com/outside");
    }

    #[test]
    fn no_match_yields_empty() {
        let doc = html::parse(LISTING);
        let strategy = Strategy::SelectorAnchorList {
            anchor_selector: "a.missing".into(),
        };
        let urls = strategy.candidates(&doc, "http://example.com", 10).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn missing_href_is_an_error() {
        let doc = html::parse(r#"<div class="news"><a class="headline">No href</a></div>"#);
        let strategy = Strategy::ParentChildList {
            parent_container: "div.news".into(),
            child_anchor: "a.headline".into(),
        };
        assert!(strategy.candidates(&doc, "http://example.com", 10).is_err());
    }
}
