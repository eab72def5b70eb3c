/// Round to 2 decimals. Used at display boundaries and for potential payout.
pub fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// USD value of a stake given the per-token price constant.
pub fn usd_value(stake: f64, price_usd: f64) -> f64 {
    stake * price_usd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_2() {
        assert_eq!(round_2(99.999), 100.0);
        assert_eq!(round_2(2.346), 2.35);
        assert_eq!(round_2(50.0 * 2.0), 100.0);
    }

    #[test]
    fn test_usd_value() {
        // SUI at $1.50
        assert_eq!(usd_value(10.0, 1.5), 15.0);
        // SBETS at $1e-6
        assert!((usd_value(10_000.0, 1e-6) - 0.01).abs() < 1e-12);
    }
}
