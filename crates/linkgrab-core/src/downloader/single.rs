//! Single-item HTTP GET streamed to the destination file.

use std::cell::{Cell, RefCell};
use std::io;
use std::path::Path;

use crate::error::FetchError;
use crate::fetch_head::parse::status_code;
use crate::http::new_easy;
use crate::storage::{Committed, FileSink};

use super::DownloadOptions;

/// Result of a completed GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Fetched {
    /// Bytes written to the destination.
    Saved(u64),
    /// Another transfer for the same name finished first; nothing was kept.
    AlreadyPresent,
}

/// Largest receive buffer libcurl accepts without clamping on older releases.
const CURL_MAX_BUFFER: usize = 512 * 1024;

/// GETs `url` into `dest`. Only a final `200 OK` produces a file; the body of
/// any other response (redirect hops included) is discarded.
pub(super) fn fetch_to_file(
    url: &str,
    dest: &Path,
    opts: &DownloadOptions,
) -> Result<Fetched, FetchError> {
    let status = Cell::new(0u32);
    let written = Cell::new(0u64);
    let sink: RefCell<Option<FileSink>> = RefCell::new(None);
    let storage_error: RefCell<Option<io::Error>> = RefCell::new(None);

    let mut easy = new_easy(url, &opts.http)?;
    easy.buffer_size(opts.buffer_bytes.clamp(1024, CURL_MAX_BUFFER))?;
    easy.progress(true)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = status_code(line) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            if status.get() != 200 {
                return Ok(data.len());
            }
            let mut sink = sink.borrow_mut();
            if sink.is_none() {
                match FileSink::create(dest, opts.atomic_writes, opts.buffer_bytes) {
                    Ok(s) => *sink = Some(s),
                    Err(e) => {
                        *storage_error.borrow_mut() = Some(e);
                        return Ok(0);
                    }
                }
            }
            if let Some(s) = sink.as_mut() {
                if let Err(e) = s.write_all(data) {
                    *storage_error.borrow_mut() = Some(e);
                    return Ok(0); // abort transfer
                }
            }
            written.set(written.get() + data.len() as u64);
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !opts.cancel.is_cancelled())?;
        transfer.perform()
    };

    let sink = sink.into_inner();
    if let Err(e) = performed {
        if let Some(s) = sink {
            s.discard();
        }
        if e.is_aborted_by_callback() {
            return Err(FetchError::Cancelled);
        }
        if e.is_write_error() {
            if let Some(io_err) = storage_error.into_inner() {
                if io_err.kind() == io::ErrorKind::AlreadyExists {
                    return Ok(Fetched::AlreadyPresent);
                }
                return Err(FetchError::Storage(io_err));
            }
        }
        return Err(FetchError::Curl(e));
    }

    let code = easy.response_code()?;
    if code != 200 {
        if let Some(s) = sink {
            s.discard();
        }
        return Err(FetchError::Http(code));
    }

    // An empty 200 body never reaches the write callback.
    let sink = match sink {
        Some(s) => s,
        None => match FileSink::create(dest, opts.atomic_writes, opts.buffer_bytes) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(Fetched::AlreadyPresent)
            }
            Err(e) => return Err(e.into()),
        },
    };
    match sink.finalize()? {
        Committed::Saved => Ok(Fetched::Saved(written.get())),
        Committed::AlreadyPresent => Ok(Fetched::AlreadyPresent),
    }
}
