//! Content loaders for reading table data from files.
//!
//! Each loader reads one file and returns palladium-core types directly.

pub mod actors;
pub mod config;

pub use actors::{Roster, RosterLoader};
pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
