use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

pub fn parse(page: &str) -> Html {
    Html::parse_document(page)
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector {selector:?}: {e}"))
}

/// Selects up to `limit` elements, in document order.
pub fn select_all<'a>(doc: &'a Html, selector: &str, limit: usize) -> Result<Vec<ElementRef<'a>>> {
    let sel = compile(selector)?;
    Ok(doc.select(&sel).take(limit).collect())
}

/// Selects the first matching element, if any.
pub fn select_first<'a>(doc: &'a Html, selector: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = compile(selector)?;
    Ok(doc.select(&sel).next())
}

pub fn href(element: ElementRef<'_>) -> Option<&str> {
    element.value().attr("href")
}

/// Text content of an element, descendants included, trimmed at the ends.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
