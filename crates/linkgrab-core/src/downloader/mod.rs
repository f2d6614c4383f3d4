//! Parallel download of extracted items.
//!
//! The item list is split into partitions (see [`partition`]), partitions go
//! into a shared queue, and a bounded pool of worker threads drains it. Each
//! worker handles the items of a partition one after another. The call
//! returns only after every worker has finished.
//!
//! An item whose destination file already exists is skipped without any
//! request; that existence check is the whole resume mechanism.

mod partition;
mod progress;
mod single;

pub use partition::partition;
pub use progress::ProgressCounter;

use std::collections::VecDeque;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Mutex;

use crate::config::{HttpConfig, LinkgrabConfig};
use crate::control::CancelToken;
use crate::error::{Error, FetchError, Result};
use crate::item::Item;
use crate::storage::ensure_output_dir;
use crate::url_model::combine_base_url;

use single::Fetched;

/// Settings for one [`download`] call.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Upper bound on concurrent transfers.
    pub workers: usize,
    /// Largest partition processed by one unit of work.
    pub partition_size: usize,
    pub buffer_bytes: usize,
    pub atomic_writes: bool,
    pub http: HttpConfig,
    pub cancel: CancelToken,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from_config(&LinkgrabConfig::default())
    }
}

impl DownloadOptions {
    pub fn from_config(cfg: &LinkgrabConfig) -> Self {
        Self {
            workers: cfg.workers(),
            partition_size: cfg.download.partition_size,
            buffer_bytes: cfg.download.buffer_bytes,
            atomic_writes: cfg.download.atomic_writes,
            http: cfg.http.clone(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// What happened to one item.
#[derive(Debug)]
pub enum ItemOutcome {
    Succeeded { bytes: u64 },
    Skipped,
    Failed(Error),
    Cancelled,
}

/// Counts for a finished run. `succeeded + skipped + failed + cancelled == total`.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub bytes: u64,
    /// One `Error::Fetch` per failed item.
    pub failures: Vec<Error>,
}

impl DownloadSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Succeeded { bytes } => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed(e) => {
                self.failed += 1;
                self.failures.push(e);
            }
            ItemOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Number of items that got a final answer (everything but cancelled).
    pub fn attempted(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// True if every item is now present in the output directory.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }
}

/// Read-only state shared by all workers of one run.
struct RunContext<'a> {
    output_dir: &'a Path,
    base_url: &'a str,
    opts: &'a DownloadOptions,
    counter: ProgressCounter,
    total: usize,
}

/// Downloads `items` into `output_dir`, resolving links against `base_url`.
///
/// Creates `output_dir` first; failure to do so is the only error returned,
/// and it happens before any request. Per-item failures are counted in the
/// summary and never stop other items.
pub fn download(
    items: &[Item],
    output_dir: &Path,
    base_url: &str,
    opts: &DownloadOptions,
) -> Result<DownloadSummary> {
    ensure_output_dir(output_dir)?;

    let partitions = partition(items, opts.partition_size);
    let num_workers = opts.workers.max(1).min(partitions.len());
    tracing::info!(
        items = items.len(),
        partitions = partitions.len(),
        workers = num_workers,
        "downloading {} item(s) to [{}]",
        items.len(),
        output_dir.display()
    );

    let ctx = RunContext {
        output_dir,
        base_url,
        opts,
        counter: ProgressCounter::new(),
        total: items.len(),
    };
    let queue: Mutex<VecDeque<&[Item]>> = Mutex::new(partitions.into_iter().collect());
    let mut summary = DownloadSummary {
        total: items.len(),
        ..DownloadSummary::default()
    };

    let (tx, rx) = mpsc::channel::<ItemOutcome>();
    std::thread::scope(|s| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let queue = &queue;
            let ctx = &ctx;
            s.spawn(move || run_worker(queue, ctx, &tx));
        }
        drop(tx);
        for outcome in rx {
            summary.record(outcome);
        }
    });

    tracing::info!(
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "download finished"
    );
    Ok(summary)
}

fn run_worker(queue: &Mutex<VecDeque<&[Item]>>, ctx: &RunContext<'_>, tx: &mpsc::Sender<ItemOutcome>) {
    loop {
        let next = queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        let Some(part) = next else {
            break;
        };
        if ctx.opts.cancel.is_cancelled() {
            for _ in part {
                let _ = tx.send(ItemOutcome::Cancelled);
            }
            continue;
        }
        for item in part {
            let outcome = if ctx.opts.cancel.is_cancelled() {
                ItemOutcome::Cancelled
            } else {
                process_item(item, ctx)
            };
            let _ = tx.send(outcome);
        }
    }
}

fn process_item(item: &Item, ctx: &RunContext<'_>) -> ItemOutcome {
    let seq = ctx.counter.next();
    let dest = item.destination(ctx.output_dir);
    if dest.exists() {
        tracing::info!(seq, total = ctx.total, "SKIPPING [{}], it already exists", item.name);
        return ItemOutcome::Skipped;
    }

    let url = combine_base_url(ctx.base_url, &item.link);
    tracing::info!(seq, total = ctx.total, url = %url, "GET [{}]", item.name);
    match single::fetch_to_file(&url, &dest, ctx.opts) {
        Ok(Fetched::Saved(bytes)) => {
            tracing::debug!(seq, bytes, "saved [{}]", item.name);
            ItemOutcome::Succeeded { bytes }
        }
        Ok(Fetched::AlreadyPresent) => {
            tracing::info!(seq, "SKIPPING [{}], saved by another worker meanwhile", item.name);
            ItemOutcome::Skipped
        }
        Err(FetchError::Cancelled) => {
            tracing::info!(seq, "cancelled [{}]", item.name);
            ItemOutcome::Cancelled
        }
        Err(source) => {
            let err = Error::Fetch {
                name: item.name.clone(),
                source,
            };
            tracing::error!(seq, "{}", err);
            ItemOutcome::Failed(err)
        }
    }
}
