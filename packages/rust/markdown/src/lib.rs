//! Markdown-to-site document transforms.
//!
//! Turns a plain markdown article into a site-ready document: infers
//! front matter, rewrites relative links for the deeper destination layout,
//! and escapes sequences the MDX renderer would misread. Everything here is
//! pure string processing; filesystem work lives in `docsite-core`.

mod escape;
mod extract;
mod frontmatter;
mod links;

use tracing::{debug, instrument};

use docsite_shared::{FrontMatter, TagRule};

pub use escape::escape_for_mdx;
pub use extract::{extract_description, extract_title, infer_tags};
pub use frontmatter::{escape_yaml_string, render_frontmatter};
pub use links::rewrite_links;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Per-file inputs to [`transform_document`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    /// Source file name, used for the fallback title.
    pub file_name: &'a str,
    /// Resolved sidebar position.
    pub position: Option<u32>,
    /// Inherited category folder name, emitted as the first tag.
    pub category: Option<&'a str>,
    /// Content-sniffing tag rules.
    pub tag_rules: &'a [TagRule],
}

/// Result of transforming one article.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// The text to write to the destination file.
    pub markdown: String,
    /// Generated front matter, or `None` when the source already had its own.
    pub frontmatter: Option<FrontMatter>,
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Whether the document already starts with a front-matter delimiter.
pub fn has_frontmatter(content: &str) -> bool {
    content.starts_with("---")
}

/// Transform one article.
///
/// Documents that already carry front matter only get link rewriting. All
/// others:
/// 1. Infer title, description and tags from the raw text
/// 2. Drop the leading `# ` heading (it becomes the title)
/// 3. Rewrite relative links
/// 4. Escape renderer-unsafe sequences
/// 5. Prepend the generated front matter and a blank line
#[instrument(skip(content, ctx), fields(file = %ctx.file_name))]
pub fn transform_document(content: &str, ctx: &DocumentContext<'_>) -> ConvertedDocument {
    if has_frontmatter(content) {
        debug!("existing front matter, rewriting links only");
        return ConvertedDocument {
            markdown: rewrite_links(content),
            frontmatter: None,
        };
    }

    let description = extract_description(content);
    let frontmatter = FrontMatter {
        title: extract_title(content, ctx.file_name),
        sidebar_position: ctx.position,
        sidebar_label: None,
        description: (!description.is_empty()).then_some(description),
        tags: infer_tags(content, ctx.category, ctx.tag_rules),
    };

    let body = strip_title_heading(content);
    let body = escape_for_mdx(&rewrite_links(body));
    let markdown = format!("{}\n{body}", render_frontmatter(&frontmatter));

    debug!(
        title = %frontmatter.title,
        tags = frontmatter.tags.len(),
        final_len = markdown.len(),
        "conversion complete"
    );

    ConvertedDocument {
        markdown,
        frontmatter: Some(frontmatter),
    }
}

/// Body without its leading `# ` heading line, trimmed; unchanged otherwise.
fn strip_title_heading(content: &str) -> &str {
    if !content.starts_with("# ") {
        return content;
    }
    content
        .split_once('\n')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
