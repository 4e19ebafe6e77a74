//! Progress reporting and run summary.

use std::path::Path;
use std::time::Duration;

/// Totals for one migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Markdown documents written.
    pub documents: usize,
    /// Non-markdown files copied verbatim.
    pub assets: usize,
    /// `_category_.json` files written.
    pub category_indexes: usize,
    /// Destination directories created (including the root).
    pub directories: usize,
    /// Markdown files whose sidebar position duplicated a sibling's.
    pub position_collisions: usize,
    pub elapsed: Duration,
}

/// Progress callback for reporting migration status.
pub trait MigrationReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a markdown document is written.
    fn document_migrated(&self, source: &Path, target: &Path);
    /// Called after a non-markdown file is copied.
    fn asset_copied(&self, source: &Path, target: &Path);
    /// Called when the run completes.
    fn done(&self, summary: &MigrationSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentReporter;

impl MigrationReporter for SilentReporter {
    fn phase(&self, _name: &str) {}
    fn document_migrated(&self, _source: &Path, _target: &Path) {}
    fn asset_copied(&self, _source: &Path, _target: &Path) {}
    fn done(&self, _summary: &MigrationSummary) {}
}
