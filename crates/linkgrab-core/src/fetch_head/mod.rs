//! Reachability probing ("dry" mode).
//!
//! Sends one HEAD request per item, strictly one after another, and reports
//! the status code. A transport failure is reported for that item and the
//! remaining items are still probed.

pub(crate) mod parse;

use std::iter::Enumerate;
use std::slice;
use std::str;

use crate::config::HttpConfig;
use crate::control::CancelToken;
use crate::error::{Error, FetchError, Result};
use crate::http::new_easy;
use crate::item::Item;
use crate::url_model::combine_base_url;

/// Outcome of one HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Position of the item in the extracted list (0-based).
    pub index: usize,
    pub name: String,
    /// Status code of the final response (after redirects).
    pub status: u32,
    /// `Content-Length` of the final response, if announced.
    pub content_length: Option<u64>,
}

impl ProbeReport {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends HEAD requests for items relative to a base URL.
#[derive(Debug, Clone)]
pub struct Prober {
    base_url: String,
    http: HttpConfig,
    cancel: CancelToken,
}

impl Prober {
    pub fn new(base_url: impl Into<String>, http: HttpConfig) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            cancel: CancelToken::new(),
        }
    }

    /// Stop probing once `cancel` is set; a request in flight is aborted.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// HEAD `url` and return the final status and announced length.
    ///
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    pub fn head(&self, url: &str) -> std::result::Result<(u32, Option<u64>), FetchError> {
        let mut headers: Vec<String> = Vec::new();
        let mut easy = new_easy(url, &self.http)?;
        easy.nobody(true)?;
        easy.progress(true)?;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.progress_function(|_, _, _, _| !self.cancel.is_cancelled())?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if e.is_aborted_by_callback() {
                return Err(FetchError::Cancelled);
            }
            return Err(FetchError::Curl(e));
        }
        let status = easy.response_code()?;
        Ok((status, parse::final_content_length(&headers)))
    }

    /// Lazily probes `items`; each call to `next()` performs one request.
    pub fn probe<'a>(&self, items: &'a [Item]) -> Probes<'a> {
        Probes {
            prober: self.clone(),
            items: items.iter().enumerate(),
        }
    }
}

/// Iterator returned by [`Prober::probe`].
pub struct Probes<'a> {
    prober: Prober,
    items: Enumerate<slice::Iter<'a, Item>>,
}

impl Iterator for Probes<'_> {
    type Item = Result<ProbeReport>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.prober.cancel.is_cancelled() {
            tracing::info!("probing cancelled");
            return None;
        }
        let (index, item) = self.items.next()?;
        let url = combine_base_url(&self.prober.base_url, &item.link);
        let outcome = match self.prober.head(&url) {
            Err(FetchError::Cancelled) => {
                tracing::info!(index, "HEAD [{}] cancelled", item.name);
                return None;
            }
            Ok((status, content_length)) => {
                tracing::info!(index, status, "HEAD [{}] => HTTP {}", item.name, status);
                Ok(ProbeReport {
                    index,
                    name: item.name.clone(),
                    status,
                    content_length,
                })
            }
            Err(source) => {
                tracing::warn!(index, "HEAD [{}] failed: {}", item.name, source);
                Err(Error::Probe {
                    index,
                    name: item.name.clone(),
                    source,
                })
            }
        };
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// Probes `items` against `base_url` with default HTTP settings.
pub fn probe<'a>(items: &'a [Item], base_url: &str) -> Probes<'a> {
    Prober::new(base_url, HttpConfig::default()).probe(items)
}
