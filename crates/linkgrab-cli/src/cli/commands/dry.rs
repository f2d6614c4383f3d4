//! `linkgrab --dry` – HEAD every item, one at a time.

use anyhow::Result;
use linkgrab_core::config::HttpConfig;
use linkgrab_core::control::CancelToken;
use linkgrab_core::fetch_head::Prober;
use linkgrab_core::Item;

pub async fn run_dry(
    items: &[Item],
    base_url: &str,
    http: &HttpConfig,
    cancel: &CancelToken,
) -> Result<()> {
    tracing::info!("probing {} item(s)", items.len());
    let items = items.to_vec();
    let prober = Prober::new(base_url, http.clone()).with_cancel(cancel.clone());

    let (ok, not_ok, failed) = tokio::task::spawn_blocking(move || {
        let (mut ok, mut not_ok, mut failed) = (0usize, 0usize, 0usize);
        for outcome in prober.probe(&items) {
            match outcome {
                Ok(report) => {
                    let size = report
                        .content_length
                        .map(|n| format!(" ({} bytes)", n))
                        .unwrap_or_default();
                    println!(
                        "{} - HEAD [{}] => HTTP {}{}",
                        report.index, report.name, report.status, size
                    );
                    if report.is_success() {
                        ok += 1;
                    } else {
                        not_ok += 1;
                    }
                }
                Err(e) => {
                    println!("{}", e);
                    failed += 1;
                }
            }
        }
        (ok, not_ok, failed)
    })
    .await
    .map_err(|e| anyhow::anyhow!("probe task join: {}", e))?;

    if cancel.is_cancelled() {
        println!("Probing interrupted");
    }
    println!(
        "Probed {} item(s): {} reachable, {} other status, {} failed",
        ok + not_ok + failed,
        ok,
        not_ok,
        failed
    );
    Ok(())
}
