//! Core domain types for the docsite migrator.

use serde::{Deserialize, Serialize};

use crate::error::{DocsiteError, Result};

/// File name of the sidecar descriptor the site generator reads for a category folder.
pub const CATEGORY_INDEX_FILE: &str = "_category_.json";

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A recognized top-level content folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    /// Folder name, matched exactly against directory entries.
    pub name: String,
    /// Sidebar label for the generated listing page.
    pub label: String,
    /// Sort position among sibling categories.
    pub position: u32,
    /// Description shown on the generated listing page.
    pub description: String,
}

impl CategoryDescriptor {
    fn builtin(name: &str, position: u32, description: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            position,
            description: description.to_string(),
        }
    }
}

/// Immutable lookup table of recognized category folders.
///
/// Threaded by reference through the directory walk; never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    entries: Vec<CategoryDescriptor>,
}

impl CategoryTable {
    /// Build a table, rejecting duplicate folder names.
    pub fn new(entries: Vec<CategoryDescriptor>) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(DocsiteError::config(format!(
                    "duplicate category folder name '{}'",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Look up a category by exact folder name.
    pub fn get(&self, folder: &str) -> Option<&CategoryDescriptor> {
        self.entries.iter().find(|e| e.name == folder)
    }

    pub fn contains(&self, folder: &str) -> bool {
        self.get(folder).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            entries: default_categories(),
        }
    }
}

/// The seven built-in content categories.
pub fn default_categories() -> Vec<CategoryDescriptor> {
    vec![
        CategoryDescriptor::builtin("案例研究", 20, "深度解析真实系统的技术架构与设计思路"),
        CategoryDescriptor::builtin("技术深度", 30, "专项技术攻略与深入探讨"),
        CategoryDescriptor::builtin("行业应用", 40, "垂直领域的实践应用"),
        CategoryDescriptor::builtin("商业与变现", 50, "产品化策略与商业模式"),
        CategoryDescriptor::builtin("视觉与设计", 60, "用户体验与界面设计"),
        CategoryDescriptor::builtin("进阶专题", 70, "前沿技术与高级话题"),
        CategoryDescriptor::builtin("实战方案", 80, "可落地执行的完整方案"),
    ]
}

// ---------------------------------------------------------------------------
// Tag rules
// ---------------------------------------------------------------------------

/// Adds `tag` to a document whose raw text contains `trigger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub trigger: String,
    pub tag: String,
}

impl TagRule {
    pub fn new(trigger: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            tag: tag.into(),
        }
    }
}

/// Built-in content-sniffing rules, in tag emission order.
pub fn default_tag_rules() -> Vec<TagRule> {
    vec![
        TagRule::new("实时", "实时系统"),
        TagRule::new("架构", "架构设计"),
        TagRule::new("WebSocket", "WebSocket"),
        TagRule::new("AI", "AI"),
    ]
}

// ---------------------------------------------------------------------------
// FrontMatter
// ---------------------------------------------------------------------------

/// Metadata block written at the top of every generated document.
///
/// Optional fields that are `None` (or empty) are omitted from the output
/// entirely rather than rendered blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub sidebar_position: Option<u32>,
    pub sidebar_label: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// CategoryIndex
// ---------------------------------------------------------------------------

/// The `_category_.json` structure written into each category folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    pub label: String,
    pub position: u32,
    pub link: CategoryLink,
}

/// Link settings asking the generator to render a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl From<&CategoryDescriptor> for CategoryIndex {
    fn from(descriptor: &CategoryDescriptor) -> Self {
        Self {
            label: descriptor.label.clone(),
            position: descriptor.position,
            link: CategoryLink {
                kind: "generated-index".to_string(),
                description: descriptor.description.clone(),
            },
        }
    }
}
