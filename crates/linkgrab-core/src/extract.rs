//! Item extraction from an HTML fragment.
//!
//! A pattern template with an `{extension}` placeholder is compiled once per
//! requested extension and run over the whole input; every match becomes an
//! [`Item`] through the name/link normalizer.

use regex::Regex;
use std::path::Path;

use crate::error::{Error, Result};
use crate::item::Item;
use crate::url_model::{normalize_link, NamingRules};

/// Placeholder substituted with each extension before compiling the pattern.
pub const EXTENSION_PLACEHOLDER: &str = "{extension}";

/// Per-extension match count, in the order the extensions were requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSummary {
    pub extension: String,
    pub count: usize,
}

/// Pattern template plus the naming rules applied to every match.
#[derive(Debug, Clone)]
pub struct Extractor {
    template: String,
    rules: NamingRules,
}

impl Extractor {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            rules: NamingRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: NamingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Compiles the template for one extension and checks the capture names.
    fn compile(&self, extension: &str) -> Result<Regex> {
        if extension.is_empty() || extension.chars().any(|c| self.rules.is_hazardous(c)) {
            return Err(Error::Pattern {
                extension: extension.to_string(),
                reason: "extension is empty or contains characters not allowed in file names"
                    .to_string(),
            });
        }
        let source = self
            .template
            .replace(EXTENSION_PLACEHOLDER, &regex::escape(extension));
        let re = Regex::new(&source).map_err(|e| Error::Pattern {
            extension: extension.to_string(),
            reason: e.to_string(),
        })?;
        for group in ["name", "link"] {
            if !re.capture_names().flatten().any(|n| n == group) {
                return Err(Error::Pattern {
                    extension: extension.to_string(),
                    reason: format!("missing named capture group `{}`", group),
                });
            }
        }
        Ok(re)
    }

    /// Runs the pattern for every extension, in order, over the whole text.
    /// A repeated extension is only run once.
    ///
    /// Matches whose name cannot be sanitized are dropped with a warning.
    /// Fails only if the pattern is unusable for one of the extensions.
    pub fn extract<S: AsRef<str>>(&self, text: &str, extensions: &[S]) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut seen: Vec<&str> = Vec::with_capacity(extensions.len());
        for extension in extensions {
            let extension = extension.as_ref();
            if seen.contains(&extension) {
                continue;
            }
            seen.push(extension);
            let re = self.compile(extension)?;
            let mut found = 0usize;
            for caps in re.captures_iter(text) {
                let (Some(raw_name), Some(raw_link)) = (caps.name("name"), caps.name("link"))
                else {
                    tracing::warn!(extension, "match without name/link capture, skipped");
                    continue;
                };
                match self.rules.normalize_name(raw_name.as_str(), extension) {
                    Ok(name) => {
                        items.push(Item {
                            name,
                            link: normalize_link(raw_link.as_str()),
                            extension: extension.to_string(),
                        });
                        found += 1;
                    }
                    Err(e) => tracing::warn!(extension, "dropping item: {}", e),
                }
            }
            tracing::info!(extension, count = found, "found {} items with extension: {}", found, extension);
        }
        Ok(items)
    }
}

/// [`Extractor::extract`] with the default naming rules.
pub fn extract<S: AsRef<str>>(text: &str, extensions: &[S], pattern_template: &str) -> Result<Vec<Item>> {
    Extractor::new(pattern_template).extract(text, extensions)
}

/// Splits a comma-separated extension list, trimming entries and dropping
/// empty and repeated ones. First occurrence wins the position.
pub fn parse_extensions(csv: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ext in csv.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|e| e == ext) {
            out.push(ext.to_string());
        }
    }
    out
}

/// Counts items per requested extension (zero counts included).
pub fn summarize<S: AsRef<str>>(items: &[Item], extensions: &[S]) -> Vec<ExtensionSummary> {
    let mut out: Vec<ExtensionSummary> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.as_ref();
        if out.iter().any(|s| s.extension == ext) {
            continue;
        }
        out.push(ExtensionSummary {
            extension: ext.to_string(),
            count: items.iter().filter(|i| i.extension == ext).count(),
        });
    }
    out
}

/// Reads the input fragment fully into memory.
///
/// Line terminators are dropped and lines concatenated, so patterns can match
/// across the line breaks of copied markup. Invalid UTF-8 is replaced.
pub fn load_input(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.lines().collect())
}
