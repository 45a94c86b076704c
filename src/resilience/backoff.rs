//! Exponential backoff with optional jitter.

use rand::Rng;
use std::time::Duration;

/// Calculate the delay to wait before retry number `retry` (1-based).
///
/// The delay is `base_ms * multiplier^(retry - 1)`, capped at `max_ms`, plus
/// up to `jitter_percent` percent of random jitter. Retry 0 means "no retry
/// yet" and yields no delay.
pub fn calculate_backoff(
    retry: u32,
    base_ms: u64,
    multiplier: u32,
    max_ms: u64,
    jitter_percent: u8,
) -> Duration {
    if retry == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = u64::from(multiplier).saturating_pow(retry - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = capped_delay.saturating_mul(u64::from(jitter_percent)) / 100;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..=jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
