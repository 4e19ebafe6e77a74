//! Target file names and sidebar positions for markdown files.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Renamed to [`INDEX_TARGET`] and pinned to the first position.
pub const INDEX_SOURCE: &str = "README.md";
pub const INDEX_TARGET: &str = "index.md";
/// "Content overview" page, pinned to the second position.
pub const OVERVIEW_SOURCE: &str = "内容总览.md";

/// Where a markdown file lands inside its destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub target_name: String,
    pub position: u32,
}

/// Assigns placements within a single directory.
///
/// One allocator per directory visit: the auto-increment counter starts at 1
/// and advances for every markdown file, including ones whose position ends
/// up fixed by name. Duplicate positions are reported, not prevented.
#[derive(Debug)]
pub struct PositionAllocator {
    next_auto: u32,
    assigned: Vec<(u32, String)>,
    collisions: usize,
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionAllocator {
    pub fn new() -> Self {
        Self {
            next_auto: 1,
            assigned: Vec::new(),
            collisions: 0,
        }
    }

    /// Resolve the placement of `file_name` (a `.md` file).
    pub fn place(&mut self, file_name: &str) -> Placement {
        static NUMBERED_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^([0-9]+)-(.+)\.md$").expect("valid regex"));

        let auto = self.next_auto;
        self.next_auto += 1;

        let placement = match file_name {
            INDEX_SOURCE => Placement {
                target_name: INDEX_TARGET.to_string(),
                position: 1,
            },
            OVERVIEW_SOURCE => Placement {
                target_name: file_name.to_string(),
                position: 2,
            },
            _ => {
                let explicit = NUMBERED_RE
                    .captures(file_name)
                    .and_then(|caps| caps[1].parse::<u32>().ok());
                Placement {
                    target_name: file_name.to_string(),
                    position: explicit.unwrap_or(auto),
                }
            }
        };

        if let Some((_, other)) = self
            .assigned
            .iter()
            .find(|(position, _)| *position == placement.position)
        {
            warn!(
                position = placement.position,
                file = file_name,
                other = %other,
                "sidebar position already taken in this directory"
            );
            self.collisions += 1;
        }
        self.assigned
            .push((placement.position, file_name.to_string()));

        placement
    }

    /// Number of placements that reused an already-assigned position.
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}
