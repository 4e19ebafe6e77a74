//! Relative link rewriting for the one-level-deeper destination layout.

use std::sync::LazyLock;

use regex::Regex;

/// Rewrite `](./x.md)` to `](../x)`, then `](folder/x.md)` to `](../folder/x)`.
///
/// Purely textual: targets are not checked for existence and code blocks are
/// not exempt. Output contains no `.md)` targets, so a second pass is a no-op.
pub fn rewrite_links(content: &str) -> String {
    static SAME_DIR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\]\(\./([^)]+)\.md\)").expect("valid regex"));
    static ONE_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\]\(([^/()\s]+)/([^/()\s]+)\.md\)").expect("valid regex")
    });

    let result = SAME_DIR_RE.replace_all(content, "](../${1})");
    ONE_SEGMENT_RE
        .replace_all(&result, "](../${1}/${2})")
        .into_owned()
}
