//! Curl handle setup shared by the prober and the downloader.

use curl::easy::Easy;

use crate::config::HttpConfig;

/// Builds a handle for `url` with redirects, timeouts and connection reuse
/// disabled (every request targets a different resource).
pub(crate) fn new_easy(url: &str, http: &HttpConfig) -> Result<Easy, curl::Error> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.forbid_reuse(true)?;
    easy.useragent(&http.user_agent)?;
    easy.connect_timeout(http.connect_timeout())?;
    // Low-speed abort catches stalled transfers; the hard timeout is the safety net.
    easy.low_speed_limit(http.low_speed_limit)?;
    easy.low_speed_time(http.low_speed_time())?;
    easy.timeout(http.timeout())?;
    Ok(easy)
}
