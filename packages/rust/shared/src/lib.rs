//! Shared types, error model, and configuration for the docsite migrator.
//!
//! This crate is the foundation depended on by all other docsite crates.
//! It provides:
//! - [`DocsiteError`], the unified error type
//! - Domain types ([`CategoryTable`], [`FrontMatter`], [`CategoryIndex`], [`TagRule`])
//! - Configuration ([`AppConfig`], [`MigrateConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, MigrateConfig, PathsConfig, init_config, load_config,
    load_config_from,
};
pub use error::{DocsiteError, Result};
pub use types::{
    CATEGORY_INDEX_FILE, CategoryDescriptor, CategoryIndex, CategoryLink, CategoryTable,
    FrontMatter, TagRule, default_categories, default_tag_rules,
};
