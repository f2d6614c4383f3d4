//! Extracted work item.

use std::path::{Path, PathBuf};

/// One downloadable resource found in the input.
///
/// `name` is already sanitized (non-empty, ends with `.<extension>`, no path
/// separators) and doubles as the item's identity on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub link: String,
    pub extension: String,
}

impl Item {
    /// Destination of this item inside `output_dir`.
    pub fn destination(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.name)
    }
}
