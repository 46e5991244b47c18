use std::time::{Duration, UNIX_EPOCH};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

static RESET_HEADER: &str = "x-rate-limit-reset";

/// Fallback wait when a 429 carries no usable reset header
const DEFAULT_WAIT: Duration = Duration::from_secs(60);

/// Time to sleep before retrying, `None` if the response is not rate limited.
pub(crate) fn check_rate_limit(status: StatusCode, headers: &HeaderMap) -> Option<Duration> {
    if status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    let now = UNIX_EPOCH.elapsed().unwrap_or_default();
    Some(wait_until_reset(headers, now).unwrap_or(DEFAULT_WAIT))
}

fn wait_until_reset(headers: &HeaderMap, now: Duration) -> Option<Duration> {
    let rate_reset_at = headers.get(RESET_HEADER)?.to_str().ok()?;
    let reset = Duration::from_secs(rate_reset_at.parse::<u64>().ok()?);
    // Resume one second after the window resets
    Some(reset.saturating_sub(now) + Duration::from_secs(1))
}
