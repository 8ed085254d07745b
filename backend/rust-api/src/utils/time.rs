use chrono::{DateTime, Utc};

/// Canonical display-timestamp format for persisted records. Chosen so that
/// lexicographic order equals chronological order; the result log sorts by
/// plain string comparison.
pub const SORTABLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn sortable_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(SORTABLE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn string_order_is_chronological_order() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert!(sortable_timestamp(earlier) < sortable_timestamp(later));
    }
}
