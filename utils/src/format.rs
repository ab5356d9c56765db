//! Human-readable rendering of ledger quantities.

/// Format a duration in seconds, keeping the two most significant units.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Group the digits of a base-unit amount in thousands: `1_000_180`.
pub fn format_units(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(3600), "1h 0m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn groups_digits() {
        assert_eq!(format_units(0), "0");
        assert_eq!(format_units(999), "999");
        assert_eq!(format_units(1_000_180), "1_000_180");
    }
}
