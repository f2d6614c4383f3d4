//! File name sanitization for extracted items.

use crate::error::{Error, Result};

use super::decode_entities;

/// Characters that are replaced no matter how the rules are configured:
/// path separators and the drive/stream separator.
const ALWAYS_REPLACED: [char; 3] = ['/', '\\', ':'];

/// Additional characters replaced by the `strict` preset (reserved on Windows).
const STRICT_EXTRA: [char; 6] = ['"', '*', '?', '<', '>', '|'];

/// Replace table used to turn a captured name into a file name.
///
/// Every character in `chars` is replaced by `replacement`. Path separators,
/// `:` and control characters are always neutralized, even if the configured
/// table leaves them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRules {
    chars: Vec<char>,
    replacement: String,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self::new(ALWAYS_REPLACED, " - ")
    }
}

impl NamingRules {
    pub fn new(chars: impl IntoIterator<Item = char>, replacement: impl Into<String>) -> Self {
        let mut table: Vec<char> = ALWAYS_REPLACED.to_vec();
        for c in chars {
            if !table.contains(&c) {
                table.push(c);
            }
        }
        // The replacement must not reintroduce what it replaces.
        let replacement = replacement
            .into()
            .chars()
            .filter(|c| !table.contains(c) && !c.is_control())
            .collect();
        Self {
            chars: table,
            replacement,
        }
    }

    /// Default table plus the characters Windows refuses in file names.
    pub fn strict() -> Self {
        Self::new(ALWAYS_REPLACED.into_iter().chain(STRICT_EXTRA), " - ")
    }

    /// Returns a copy with `extra` added to the replace table.
    pub fn with_extra_chars(&self, extra: impl IntoIterator<Item = char>) -> Self {
        Self::new(self.chars.iter().copied().chain(extra), self.replacement.clone())
    }

    /// Returns a copy that uses `replacement` instead of the current one.
    pub fn with_replacement(&self, replacement: impl Into<String>) -> Self {
        Self::new(self.chars.iter().copied(), replacement)
    }

    /// True if `c` would be rewritten by these rules.
    pub fn is_hazardous(&self, c: char) -> bool {
        c.is_control() || self.chars.contains(&c)
    }

    /// Sanitizes `raw` and makes sure it ends with `.<extension>`.
    ///
    /// Steps: decode `&amp;`, replace hazardous characters, collapse
    /// whitespace, trim, append the extension if missing, collapse `..`.
    /// Fails with [`Error::MalformedItem`] if nothing is left before the
    /// extension is appended.
    pub fn normalize_name(&self, raw: &str, extension: &str) -> Result<String> {
        let decoded = decode_entities(raw);

        let mut replaced = String::with_capacity(decoded.len());
        for c in decoded.chars() {
            if c.is_control() {
                replaced.push(' ');
            } else if self.chars.contains(&c) {
                replaced.push_str(&self.replacement);
            } else {
                replaced.push(c);
            }
        }

        let mut name = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(Error::MalformedItem {
                raw: raw.to_string(),
                extension: extension.to_string(),
            });
        }

        let suffix = format!(".{}", extension);
        if !name.ends_with(&suffix) {
            name.push_str(&suffix);
        }

        while name.contains("..") {
            name = name.replace("..", ".");
        }
        Ok(name)
    }
}

/// [`NamingRules::normalize_name`] with the default rules.
pub fn normalize_name(raw: &str, extension: &str) -> Result<String> {
    NamingRules::default().normalize_name(raw, extension)
}
