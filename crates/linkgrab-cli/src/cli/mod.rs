//! CLI for linkgrab.

mod commands;
mod help;

use anyhow::{bail, Result};
use clap::Parser;
use linkgrab_core::config::{self, LinkgrabConfig};
use linkgrab_core::control::CancelToken;
use linkgrab_core::downloader::DownloadOptions;
use linkgrab_core::extract::{load_input, parse_extensions, Extractor};
use std::path::PathBuf;

use commands::{run_download, run_dry, run_list};

/// Top-level CLI. Any combination of `--list`, `--dry` and `--download` may
/// be given; with none of them the usage guide is printed and nothing runs.
#[derive(Debug, Parser)]
#[command(name = "linkgrab")]
#[command(about = "Extract download links from a saved HTML fragment and fetch them", long_about = None)]
pub struct Cli {
    /// Parse the input file and list the items found.
    #[arg(long)]
    pub list: bool,

    /// HEAD every item to make sure a download would work; no data is transferred.
    #[arg(long)]
    pub dry: bool,

    /// Download the items, skipping files that already exist in the output directory.
    #[arg(long)]
    pub download: bool,

    /// Extensions to fetch, comma separated (e.g. pdf,epub,cbz). Overrides the profile's formats.
    #[arg(long, value_name = "CSV")]
    pub get: Option<String>,

    /// Input HTML fragment (default from config: ./page.html).
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output directory, created if missing (default from config: ./output).
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Site profile (pattern, base URL, default formats) from config.toml.
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Number of parallel downloads (default: available CPUs).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cli.run(cfg).await
    }

    fn has_mode(&self) -> bool {
        self.list || self.dry || self.download
    }

    async fn run(self, mut cfg: LinkgrabConfig) -> Result<()> {
        let (profile_name, profile) = cfg.profile(self.profile.as_deref())?;
        let profile_name = profile_name.to_string();
        let profile = profile.clone();

        if !self.has_mode() {
            help::print_help(&cfg, &profile_name, &profile)?;
            return Ok(());
        }

        let input = self.input.clone().unwrap_or_else(|| cfg.input_file.clone());
        let output = self.output.clone().unwrap_or_else(|| cfg.output_dir.clone());
        let extensions = parse_extensions(self.get.as_deref().unwrap_or(&profile.formats));
        if extensions.is_empty() {
            bail!("no extensions to fetch (check --get or the profile's formats)");
        }
        if let Some(jobs) = self.jobs {
            cfg.download.workers = Some(jobs.max(1));
        }

        tracing::info!(
            profile = %profile_name,
            input = %input.display(),
            "loading download items with formats {:?}",
            extensions
        );
        let text = load_input(&input)?;
        let items = Extractor::new(profile.pattern.as_str())
            .with_rules(cfg.naming.rules())
            .extract(&text, &extensions)?;

        let cancel = CancelToken::new();
        spawn_ctrl_c_listener(cancel.clone());

        if self.list {
            run_list(&items, &extensions);
        }
        if self.dry {
            run_dry(&items, &profile.base_url, &cfg.http, &cancel).await?;
        }
        if self.download {
            let opts = DownloadOptions::from_config(&cfg).with_cancel(cancel.clone());
            run_download(&items, &output, &profile.base_url, opts).await?;
        }

        tracing::info!("job done");
        Ok(())
    }
}

/// Exit status after a second interrupt (128 + SIGINT).
const INTERRUPTED_EXIT: i32 = 130;

/// First Ctrl-C stops new work and aborts requests in flight cooperatively.
/// A second one exits immediately; tokio keeps the SIGINT handler installed,
/// so without it further presses would be swallowed.
fn spawn_ctrl_c_listener(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!("interrupted, finishing up... (press Ctrl-C again to quit now)");
        tracing::warn!("interrupt received, cancelling");
        cancel.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("second interrupt received, exiting");
            std::process::exit(INTERRUPTED_EXIT);
        }
    });
}

#[cfg(test)]
mod tests;
