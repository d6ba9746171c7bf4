use std::path::Path;

use anyhow::Result;
use regex::RegexBuilder;

/// Loads the required-keyword list, one keyword per line.
///
/// Blank lines and `#` comments are skipped, keywords are lowercased.
/// A missing file means no filtering is configured.
pub fn load_required_keywords(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs_err::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}

/// Checks whether `content` contains at least one required keyword as a
/// whole word, case-insensitively. An empty keyword set always passes.
///
/// The evaluated keyword set is returned alongside the verdict so callers
/// can log which set was applied.
pub fn has_keywords<'a>(content: &str, required: &'a [String]) -> Result<(bool, &'a [String])> {
    if required.is_empty() {
        return Ok((true, required));
    }
    for word in required {
        let pattern = format!(r"\b{}\b", regex::escape(word));
        let re = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        if re.is_match(content) {
            return Ok((true, required));
        }
    }
    Ok((false, required))
}
