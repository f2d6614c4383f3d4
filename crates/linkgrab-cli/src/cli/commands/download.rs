//! `linkgrab --download` – fetch every item that is not on disk yet.

use anyhow::{Context, Result};
use linkgrab_core::downloader::{self, DownloadOptions};
use linkgrab_core::Item;
use std::path::Path;

pub async fn run_download(
    items: &[Item],
    output_dir: &Path,
    base_url: &str,
    opts: DownloadOptions,
) -> Result<()> {
    println!(
        "Downloading {} item(s) to {} with {} worker(s)",
        items.len(),
        output_dir.display(),
        opts.workers
    );
    let items = items.to_vec();
    let output = output_dir.to_path_buf();
    let base_url = base_url.to_string();

    let summary = tokio::task::spawn_blocking(move || {
        downloader::download(&items, &output, &base_url, &opts)
    })
    .await
    .map_err(|e| anyhow::anyhow!("download task join: {}", e))?
    .context("download aborted")?;

    for failure in &summary.failures {
        println!("FAILED {}", failure);
    }
    println!(
        "Attempted {} of {} item(s): {} downloaded, {} skipped (already present), {} failed",
        summary.attempted(),
        summary.total,
        summary.succeeded,
        summary.skipped,
        summary.failed
    );
    if summary.cancelled > 0 {
        println!("{} item(s) not downloaded because the run was interrupted", summary.cancelled);
    }
    Ok(())
}
