//! End-to-end migration: source tree → site content tree.
//!
//! Layout produced for a source tree like:
//! ```text
//! articles/                      docs/
//! ├── README.md                  ├── index.md
//! ├── 内容总览.md                 ├── 内容总览.md
//! └── 技术深度/                   └── 技术深度/
//!     ├── 01-推送.md                 ├── _category_.json
//!     └── diagram.png                ├── 01-推送.md
//!                                    └── diagram.png
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use docsite_markdown::{ConvertedDocument, DocumentContext, transform_document};
use docsite_shared::{
    CATEGORY_INDEX_FILE, CategoryDescriptor, CategoryIndex, CategoryTable, DocsiteError,
    MigrateConfig, Result, TagRule,
};

use crate::placement::PositionAllocator;
use crate::report::{MigrationReporter, MigrationSummary};

/// Read-only state shared by every directory visit.
pub struct WalkContext<'a> {
    pub categories: &'a CategoryTable,
    pub tag_rules: &'a [TagRule],
    pub reporter: &'a dyn MigrationReporter,
}

/// Run a full migration: validate, reset the target tree, then walk the source.
#[instrument(skip_all, fields(source = %config.source_dir.display(), target = %config.target_dir.display()))]
pub fn migrate(
    config: &MigrateConfig,
    reporter: &dyn MigrationReporter,
) -> Result<MigrationSummary> {
    let start = Instant::now();

    reporter.phase("Preparing target directory");
    prepare_target(&config.source_dir, &config.target_dir)?;

    let ctx = WalkContext {
        categories: &config.categories,
        tag_rules: &config.tag_rules,
        reporter,
    };
    let mut summary = MigrationSummary::default();

    reporter.phase("Migrating documents");
    process_directory(&config.source_dir, &config.target_dir, None, &ctx, &mut summary)?;

    summary.elapsed = start.elapsed();
    info!(
        documents = summary.documents,
        assets = summary.assets,
        category_indexes = summary.category_indexes,
        collisions = summary.position_collisions,
        "migration complete"
    );
    reporter.done(&summary);

    Ok(summary)
}

/// Check the source exists, then delete and recreate the target.
///
/// Nothing is touched unless the source is a directory and the two trees are
/// disjoint.
pub fn prepare_target(source: &Path, target: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(DocsiteError::config(format!(
            "source directory does not exist: {}",
            source.display()
        )));
    }

    let source_abs = resolve_path(source)?;
    let target_abs = resolve_path(target)?;

    if source_abs.starts_with(&target_abs) || target_abs.starts_with(&source_abs) {
        return Err(DocsiteError::validation(format!(
            "target {} overlaps source {}; refusing to clear it",
            target.display(),
            source.display()
        )));
    }

    if target.exists() {
        std::fs::remove_dir_all(target).map_err(|e| DocsiteError::io(target, e))?;
        debug!(path = %target.display(), "removed previous target tree");
    }
    std::fs::create_dir_all(target).map_err(|e| DocsiteError::io(target, e))?;

    Ok(())
}

/// Mirror one source directory into `target`, recursing depth-first.
///
/// `category` is inherited from the nearest recognized ancestor folder.
#[instrument(skip(source, target, ctx, summary), fields(dir = %source.display()))]
pub fn process_directory(
    source: &Path,
    target: &Path,
    category: Option<&str>,
    ctx: &WalkContext<'_>,
    summary: &mut MigrationSummary,
) -> Result<()> {
    std::fs::create_dir_all(target).map_err(|e| DocsiteError::io(target, e))?;
    summary.directories += 1;

    let mut allocator = PositionAllocator::new();

    for (name, path) in list_entries(source)? {
        if name.starts_with('.') {
            continue;
        }

        let metadata = std::fs::metadata(&path).map_err(|e| DocsiteError::io(&path, e))?;

        if metadata.is_dir() {
            let sub_target = target.join(&name);
            let descriptor = ctx.categories.get(&name);
            let sub_category = descriptor.map(|d| d.name.as_str()).or(category);

            process_directory(&path, &sub_target, sub_category, ctx, summary)?;

            if let Some(descriptor) = descriptor {
                write_category_index(descriptor, &sub_target)?;
                summary.category_indexes += 1;
            }
        } else if name.ends_with(".md") {
            let placement = allocator.place(&name);
            let target_path = target.join(&placement.target_name);

            let converted = process_markdown_file(
                &path,
                &target_path,
                &DocumentContext {
                    file_name: &name,
                    position: Some(placement.position),
                    category,
                    tag_rules: ctx.tag_rules,
                },
            )?;

            match &converted.frontmatter {
                Some(fm) => info!(
                    source = %name,
                    target = %placement.target_name,
                    position = placement.position,
                    title = %fm.title,
                    tags = ?fm.tags,
                    "migrated document"
                ),
                None => info!(
                    source = %name,
                    target = %placement.target_name,
                    "migrated document, kept existing front matter"
                ),
            }
            ctx.reporter.document_migrated(&path, &target_path);
            summary.documents += 1;
        } else if metadata.is_file() {
            let target_path = target.join(&name);
            std::fs::copy(&path, &target_path).map_err(|e| DocsiteError::io(&path, e))?;
            debug!(file = %name, "copied asset");
            ctx.reporter.asset_copied(&path, &target_path);
            summary.assets += 1;
        }
    }

    summary.position_collisions += allocator.collisions();
    Ok(())
}

/// Transform a single markdown file and write the result to `target`.
pub fn process_markdown_file(
    source: &Path,
    target: &Path,
    ctx: &DocumentContext<'_>,
) -> Result<ConvertedDocument> {
    let content = std::fs::read_to_string(source).map_err(|e| DocsiteError::io(source, e))?;
    let converted = transform_document(&content, ctx);

    std::fs::write(target, &converted.markdown).map_err(|e| DocsiteError::io(target, e))?;
    debug!(path = %target.display(), "wrote document");

    Ok(converted)
}

/// Write `_category_.json` into `dir` so the generator renders a listing page.
pub fn write_category_index(descriptor: &CategoryDescriptor, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CATEGORY_INDEX_FILE);
    let json = serde_json::to_string_pretty(&CategoryIndex::from(descriptor))
        .map_err(|e| DocsiteError::Serialize(format!("JSON serialization failed: {e}")))?;

    std::fs::write(&path, json).map_err(|e| DocsiteError::io(&path, e))?;
    debug!(path = %path.display(), label = %descriptor.label, "wrote category index");

    Ok(path)
}

/// Canonical form of `path`. When it does not exist yet, existing prefixes
/// are canonicalized and `..` pops the component resolved so far.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return std::fs::canonicalize(path).map_err(|e| DocsiteError::io(path, e));
    }

    let abs = std::path::absolute(path).map_err(|e| DocsiteError::io(path, e))?;
    let mut resolved = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => {
                resolved.push(other);
                if resolved.exists() {
                    resolved = std::fs::canonicalize(&resolved)
                        .map_err(|e| DocsiteError::io(&resolved, e))?;
                }
            }
        }
    }
    Ok(resolved)
}

/// Directory entries with UTF-8 names, sorted by name for a stable walk order.
fn list_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let read = std::fs::read_dir(dir).map_err(|e| DocsiteError::io(dir, e))?;

    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| DocsiteError::io(dir, e))?;
        let path = entry.path();
        match entry.file_name().into_string() {
            Ok(name) => entries.push((name, path)),
            Err(_) => warn!(path = %path.display(), "skipping entry with non UTF-8 name"),
        }
    }

    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use docsite_shared::{CategoryTable, default_tag_rules};

    use super::*;
    use crate::report::SilentReporter;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("docsite-migrate-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn read(root: &Path, rel: &str) -> String {
        std::fs::read_to_string(root.join(rel))
            .unwrap_or_else(|e| panic!("failed to read {rel}: {e}"))
    }

    fn make_config(root: &Path) -> MigrateConfig {
        MigrateConfig {
            source_dir: root.join("src"),
            target_dir: root.join("out"),
            categories: CategoryTable::default(),
            tag_rules: default_tag_rules(),
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        documents: Mutex<Vec<(PathBuf, PathBuf)>>,
        finished: Mutex<bool>,
    }

    impl MigrationReporter for RecordingReporter {
        fn phase(&self, _name: &str) {}
        fn document_migrated(&self, source: &Path, target: &Path) {
            self.documents
                .lock()
                .unwrap()
                .push((source.to_path_buf(), target.to_path_buf()));
        }
        fn asset_copied(&self, _source: &Path, _target: &Path) {}
        fn done(&self, _summary: &MigrationSummary) {
            *self.finished.lock().unwrap() = true;
        }
    }

    #[test]
    fn filename_mapping_scenarios() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, "README.md", "# Home\n\nWelcome.");
        write(&config.source_dir, "03-foo.md", "# Foo\n");
        write(&config.source_dir, "内容总览.md", "# 总览\n");
        write(&config.source_dir, "bar.md", "# Bar\n");

        migrate(&config, &SilentReporter).expect("migrate");
        let out = &config.target_dir;

        assert!(!out.join("README.md").exists());
        assert!(read(out, "index.md").contains("sidebar_position: 1\n"));
        assert!(read(out, "03-foo.md").contains("sidebar_position: 3\n"));
        assert!(read(out, "内容总览.md").contains("sidebar_position: 2\n"));
        // Third markdown file in byte order, after "03-foo.md" and "README.md".
        assert!(read(out, "bar.md").contains("sidebar_position: 3\n"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn first_plain_file_gets_position_one() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, "bar.md", "# Bar\n");

        migrate(&config, &SilentReporter).expect("migrate");
        assert!(read(&config.target_dir, "bar.md").contains("sidebar_position: 1\n"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn category_inherited_and_index_written() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, "技术深度/子主题/article.md", "# Article\n\nBody.");
        write(&config.source_dir, "技术深度/实战方案/plan.md", "# Plan\n");
        write(&config.source_dir, "misc/note.md", "# Note\n");

        let summary = migrate(&config, &SilentReporter).expect("migrate");
        let out = &config.target_dir;

        let article = read(out, "技术深度/子主题/article.md");
        assert!(article.contains("tags:\n  - \"技术深度\"\n"));

        let plan = read(out, "技术深度/实战方案/plan.md");
        assert!(plan.contains("  - \"实战方案\"\n"));
        assert!(!plan.contains("  - \"技术深度\"\n"));

        assert!(!read(out, "misc/note.md").contains("tags:"));

        let index: CategoryIndex =
            serde_json::from_str(&read(out, "技术深度/_category_.json")).expect("valid json");
        assert_eq!(index.position, 30);
        assert_eq!(index.link.kind, "generated-index");
        assert!(out.join("技术深度/实战方案/_category_.json").exists());
        assert!(!out.join("技术深度/子主题/_category_.json").exists());
        assert!(!out.join("misc/_category_.json").exists());
        assert_eq!(summary.category_indexes, 2);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn existing_frontmatter_passes_through() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        let input = "---\ntitle: Custom\n---\n\n# Custom\n\nSee [a](./b.md), [c](d/e.md) and {x} <5.\n";
        write(&config.source_dir, "custom.md", input);

        migrate(&config, &SilentReporter).expect("migrate");
        assert_eq!(
            read(&config.target_dir, "custom.md"),
            "---\ntitle: Custom\n---\n\n# Custom\n\nSee [a](../b), [c](../d/e) and {x} <5.\n"
        );

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn hidden_entries_skipped_and_assets_copied() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, ".git/config", "x");
        write(&config.source_dir, ".draft.md", "# Draft");
        write(&config.source_dir, "img/diagram.png", "PNGDATA");
        write(&config.source_dir, "a.md", "# A");

        let summary = migrate(&config, &SilentReporter).expect("migrate");
        let out = &config.target_dir;

        assert!(!out.join(".git").exists());
        assert!(!out.join(".draft.md").exists());
        assert_eq!(read(out, "img/diagram.png"), "PNGDATA");
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.assets, 1);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn target_rebuilt_from_scratch() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, "a.md", "# A");
        write(&config.target_dir, "stale.md", "old");

        migrate(&config, &SilentReporter).expect("migrate");
        assert!(!config.target_dir.join("stale.md").exists());
        assert!(config.target_dir.join("a.md").exists());

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_source_leaves_target_untouched() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.target_dir, "keep.md", "keep");

        let err = migrate(&config, &SilentReporter).unwrap_err();
        assert!(matches!(err, DocsiteError::Config { .. }));
        assert!(err.to_string().contains("source directory does not exist"));
        assert_eq!(read(&config.target_dir, "keep.md"), "keep");

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn overlapping_target_rejected() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        write(&config.source_dir, "a.md", "# A");

        config.target_dir = tmp.clone();
        let err = migrate(&config, &SilentReporter).unwrap_err();
        assert!(matches!(err, DocsiteError::Validation { .. }));

        config.target_dir = config.source_dir.join("docs");
        let err = migrate(&config, &SilentReporter).unwrap_err();
        assert!(matches!(err, DocsiteError::Validation { .. }));
        assert!(config.source_dir.join("a.md").exists());

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn parent_components_in_missing_target_resolved() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        write(&config.source_dir, "a.md", "# A");

        config.target_dir = tmp.join("missing/../src");
        let err = migrate(&config, &SilentReporter).unwrap_err();
        assert!(matches!(err, DocsiteError::Validation { .. }));
        assert_eq!(read(&config.source_dir, "a.md"), "# A");
        assert!(!tmp.join("missing").exists());

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn process_markdown_file_returns_generated_frontmatter() {
        let tmp = temp_dir();
        write(&tmp, "in/03-push.md", "# 推送\n\n基于 WebSocket 的推送。");
        write(&tmp, "in/kept.md", "---\ntitle: Kept\n---\n");
        std::fs::create_dir_all(tmp.join("out")).unwrap();
        let rules = default_tag_rules();

        let generated = process_markdown_file(
            &tmp.join("in/03-push.md"),
            &tmp.join("out/03-push.md"),
            &DocumentContext {
                file_name: "03-push.md",
                position: Some(3),
                category: Some("技术深度"),
                tag_rules: &rules,
            },
        )
        .expect("process");
        let fm = generated.frontmatter.expect("generated front matter");
        assert_eq!(fm.title, "推送");
        assert_eq!(fm.tags, ["技术深度", "WebSocket"]);
        assert_eq!(read(&tmp, "out/03-push.md"), generated.markdown);

        let kept = process_markdown_file(
            &tmp.join("in/kept.md"),
            &tmp.join("out/kept.md"),
            &DocumentContext {
                file_name: "kept.md",
                position: Some(1),
                category: None,
                tag_rules: &rules,
            },
        )
        .expect("process");
        assert!(kept.frontmatter.is_none());
        assert_eq!(read(&tmp, "out/kept.md"), "---\ntitle: Kept\n---\n");

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn reporter_sees_every_document() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, "README.md", "# Home");
        write(&config.source_dir, "案例研究/01-case.md", "# Case");

        let reporter = RecordingReporter::default();
        let summary = migrate(&config, &reporter).expect("migrate");

        let documents = reporter.documents.lock().unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().any(|(src, dst)| {
            src.ends_with("README.md") && dst.ends_with("index.md")
        }));
        assert!(*reporter.finished.lock().unwrap());
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.directories, 2);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn position_collisions_reported() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        write(&config.source_dir, "README.md", "# Home");
        write(&config.source_dir, "01-intro.md", "# Intro");

        let summary = migrate(&config, &SilentReporter).expect("migrate");
        assert_eq!(summary.position_collisions, 1);

        std::fs::remove_dir_all(&tmp).ok();
    }
}
