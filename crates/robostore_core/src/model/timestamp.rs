//! Wall-clock helpers for record timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Unix epoch seconds, as stored in `created_at` / `updated_at`.
pub type EpochSecs = i64;

/// Returns the current wall-clock time in epoch seconds.
///
/// A clock set before the epoch yields `0` rather than failing.
pub fn now_epoch_secs() -> EpochSecs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::now_epoch_secs;

    #[test]
    fn now_is_after_2020() {
        assert!(now_epoch_secs() > 1_577_836_800);
    }
}
