//! Weekly batch bucketing. Every nota belongs to the Monday-anchored civil
//! week in Mexico City time, regardless of the host timezone; the batch key
//! scopes duplicate detection on upload.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};

/// Mexico City has been on UTC-6 year-round since DST was abolished in
/// 2022, so a fixed offset is an exact civil conversion.
const MEXICO_CITY_OFFSET_HOURS: i32 = -6;

fn mexico_city() -> FixedOffset {
    FixedOffset::east_opt(MEXICO_CITY_OFFSET_HOURS * 3600).expect("offset in range")
}

/// Batch key for `now`: the ISO date of the most recent Monday in Mexico
/// City civil time.
pub fn current_batch_key(now: DateTime<Utc>) -> String {
    batch_key_for(now, mexico_city())
}

/// Monday of the civil week containing `now` in the given zone, formatted
/// `YYYY-MM-DD`.
pub fn batch_key_for(now: DateTime<Utc>, tz: FixedOffset) -> String {
    let civil = now.with_timezone(&tz).date_naive();
    let days_since_monday = civil.weekday().num_days_from_monday() as i64;
    let monday = civil - Duration::days(days_since_monday);
    monday.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stable_for_the_whole_civil_week() {
        // 2026-03-02 is a Monday. Monday 00:01 and Sunday 23:59 Mexico City
        // time bracket the same civil week.
        let monday_early = Utc.with_ymd_and_hms(2026, 3, 2, 6, 1, 0).unwrap();
        let thursday = Utc.with_ymd_and_hms(2026, 3, 5, 18, 0, 0).unwrap();
        let sunday_late = Utc.with_ymd_and_hms(2026, 3, 9, 5, 59, 0).unwrap();

        assert_eq!(current_batch_key(monday_early), "2026-03-02");
        assert_eq!(current_batch_key(thursday), "2026-03-02");
        assert_eq!(current_batch_key(sunday_late), "2026-03-02");
    }

    #[test]
    fn rolls_over_at_civil_monday_midnight() {
        // Sunday 23:59 vs Monday 00:01, both in Mexico City time.
        let sunday = Utc.with_ymd_and_hms(2026, 3, 9, 5, 59, 0).unwrap();
        let monday = Utc.with_ymd_and_hms(2026, 3, 9, 6, 1, 0).unwrap();

        let before = current_batch_key(sunday);
        let after = current_batch_key(monday);
        assert_eq!(before, "2026-03-02");
        assert_eq!(after, "2026-03-09");
        assert!(before < after);
    }

    #[test]
    fn civil_date_wins_over_utc_date() {
        // Monday 20:00 in Mexico City is already Tuesday in UTC; the key
        // must still be that Monday.
        let late_monday = Utc.with_ymd_and_hms(2026, 3, 3, 2, 0, 0).unwrap();
        assert_eq!(current_batch_key(late_monday), "2026-03-02");
    }

    #[test]
    fn zero_pads_month_and_day() {
        // 2026-04-06 is a Monday.
        let now = Utc.with_ymd_and_hms(2026, 4, 8, 12, 0, 0).unwrap();
        assert_eq!(current_batch_key(now), "2026-04-06");
    }

    #[test]
    fn offset_is_injectable() {
        let utc = FixedOffset::east_opt(0).unwrap();
        // Sunday 23:30 UTC is still the prior week in UTC, but already
        // Monday in UTC+1.
        let now = Utc.with_ymd_and_hms(2026, 3, 8, 23, 30, 0).unwrap();
        assert_eq!(batch_key_for(now, utc), "2026-03-02");
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(batch_key_for(now, plus_one), "2026-03-09");
    }
}
