pub const NANOS_PER_MILLI: u64 = 1_000_000;
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: u64 = 24 * NANOS_PER_HOUR;
pub const NANOS_PER_WEEK: u64 = 7 * NANOS_PER_DAY;

pub fn nanos_to_millis(ts: u64) -> u64 {
    ts / NANOS_PER_MILLI
}

pub fn millis_to_nanos(ts: u64) -> u64 {
    ts * NANOS_PER_MILLI
}

/// Start of the ISO week containing `ts`: Monday 00:00 UTC, in nanoseconds.
/// The revenue engine partitions all reads by this boundary.
pub fn week_start(ts: u64) -> u64 {
    let days_since_epoch = ts / NANOS_PER_DAY;
    // epoch day 0 was a Thursday, so Monday-based weekday = (days + 3) % 7
    let weekday = (days_since_epoch + 3) % 7;
    (days_since_epoch - weekday) * NANOS_PER_DAY
}

/// Exclusive end of the ISO week starting at `week_start_ts`.
pub fn week_end(week_start_ts: u64) -> u64 {
    week_start_ts + NANOS_PER_WEEK
}

/// Fractional days elapsed between two timestamps. Staking accrual is
/// computed over fractional days, not calendar days.
pub fn days_elapsed(from_ts: u64, to_ts: u64) -> f64 {
    if to_ts <= from_ts {
        return 0.0;
    }
    (to_ts - from_ts) as f64 / NANOS_PER_DAY as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-06-16 00:00:00 UTC, a Monday
    const MONDAY_NS: u64 = 1_750_032_000 * NANOS_PER_SECOND;

    #[test]
    fn test_week_start_on_monday() {
        assert_eq!(week_start(MONDAY_NS), MONDAY_NS);
    }

    #[test]
    fn test_week_start_mid_week() {
        let wednesday = MONDAY_NS + 2 * NANOS_PER_DAY + 5 * NANOS_PER_HOUR;
        assert_eq!(week_start(wednesday), MONDAY_NS);
    }

    #[test]
    fn test_week_start_sunday_belongs_to_prior_monday() {
        let sunday_late = MONDAY_NS + 6 * NANOS_PER_DAY + 23 * NANOS_PER_HOUR;
        assert_eq!(week_start(sunday_late), MONDAY_NS);
        // next Monday starts a new week
        assert_eq!(week_start(MONDAY_NS + NANOS_PER_WEEK), MONDAY_NS + NANOS_PER_WEEK);
    }

    #[test]
    fn test_days_elapsed() {
        let from = MONDAY_NS;
        let to = MONDAY_NS + NANOS_PER_DAY + NANOS_PER_DAY / 2;
        assert!((days_elapsed(from, to) - 1.5).abs() < 1e-9);
        assert_eq!(days_elapsed(to, from), 0.0);
    }
}
