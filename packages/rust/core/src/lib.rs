//! Filesystem side of the docsite migrator.
//!
//! Walks a source tree of plain markdown articles and rebuilds the site's
//! content tree from it, using `docsite-markdown` for the per-document
//! transforms.

pub mod migrate;
pub mod placement;
pub mod report;

pub use migrate::{
    WalkContext, migrate, prepare_target, process_directory, process_markdown_file,
    write_category_index,
};
pub use placement::{Placement, PositionAllocator};
pub use report::{MigrationReporter, MigrationSummary, SilentReporter};
