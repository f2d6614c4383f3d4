//! Usage guide printed when no mode is selected.

use anyhow::Result;
use clap::CommandFactory;
use linkgrab_core::config::{LinkgrabConfig, Profile};

use super::Cli;

const RULE: &str = "==========================================================";

/// Step-by-step guide shown below the flag reference.
pub(super) fn usage_guide() -> String {
    [
        "How to use:",
        "  1. Open the page listing the files you want to download",
        "  2. Open the browser's developer tools and copy the HTML fragment containing all the items",
        "  3. Paste the fragment into a file called \"page.html\" (or pass --input)",
        "  4. Run linkgrab --list to make sure all items are recognized",
        "  5. (optional) Run linkgrab --dry to make sure all items can be downloaded",
        "  6. Run linkgrab --download to download all items",
        "  7. If a download stops at any point, run it again: files already downloaded are skipped",
    ]
    .join("\n")
}

/// Effective defaults for the selected profile.
pub(super) fn defaults_section(cfg: &LinkgrabConfig, profile_name: &str, profile: &Profile) -> String {
    let base = if profile.base_url.is_empty() {
        "(links are absolute)"
    } else {
        profile.base_url.as_str()
    };
    format!(
        "Default settings:\n  - profile:       {}\n  - input file:    {}\n  - output folder: {}\n  - get:           {}\n  - base URL:      {}",
        profile_name,
        cfg.input_file.display(),
        cfg.output_dir.display(),
        profile.formats,
        base
    )
}

pub(super) fn print_help(cfg: &LinkgrabConfig, profile_name: &str, profile: &Profile) -> Result<()> {
    println!("{}", RULE);
    Cli::command().print_help()?;
    println!("{}", RULE);
    println!("{}", usage_guide());
    println!("{}", RULE);
    println!("{}", defaults_section(cfg, profile_name, profile));
    println!("{}", RULE);
    Ok(())
}
