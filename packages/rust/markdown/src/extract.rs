//! Title, description, and tag inference from raw article text.

use std::sync::LazyLock;

use regex::Regex;

use docsite_shared::TagRule;

/// Maximum description length, in characters.
const DESCRIPTION_MAX_CHARS: usize = 150;

/// Only lines 2..=10 are scanned for a description.
const DESCRIPTION_SCAN_LINES: usize = 10;

/// Title from a leading `# ` heading, falling back to the file name
/// without its `NN-` ordering prefix and `.md` suffix.
pub fn extract_title(content: &str, file_name: &str) -> String {
    static ORDER_PREFIX_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9]+-").expect("valid regex"));

    let first_line = content.split('\n').next().unwrap_or_default();
    if let Some(heading) = first_line.strip_prefix("# ") {
        return heading.trim().to_string();
    }

    let stem = ORDER_PREFIX_RE.replace(file_name, "");
    stem.strip_suffix(".md").unwrap_or(&stem).to_string()
}

/// First prose line after the title line, truncated. Empty when none is found.
pub fn extract_description(content: &str) -> String {
    content
        .split('\n')
        .take(DESCRIPTION_SCAN_LINES)
        .skip(1)
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("---"))
        .map(|line| line.chars().take(DESCRIPTION_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// Category tag first, then every rule whose trigger occurs in `content`.
pub fn infer_tags(content: &str, category: Option<&str>, rules: &[TagRule]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    if let Some(category) = category {
        tags.push(category.to_string());
    }

    for rule in rules {
        if content.contains(rule.trigger.as_str()) && !tags.contains(&rule.tag) {
            tags.push(rule.tag.clone());
        }
    }

    tags
}
