//! Display helpers for profile fields.

use chrono::{DateTime, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Label shown next to "last updated" once a profile has been edited.
/// The backend does not report how many edits happened.
pub const UPDATE_COUNT_LABEL: &str = "1+";

/// Two-character uppercase avatar initials.
pub fn initials(username: &str) -> String {
    username.chars().take(2).collect::<String>().to_uppercase()
}

/// Long-form date, e.g. `May 1, 2024`.
pub fn long_date(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}

/// Days between `created_at` and `now`, rounded up. Order does not matter.
pub fn member_days(created_at: &DateTime<Utc>, now: &DateTime<Utc>) -> i64 {
    let diff_ms = (*now - *created_at).num_milliseconds().abs();
    (diff_ms + DAY_MS - 1) / DAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn initials_are_two_uppercase_chars() {
        assert_eq!(initials("alice"), "AL");
        assert_eq!(initials("x"), "X");
        assert_eq!(initials(""), "");
        assert_eq!(initials("élan"), "ÉL");
    }

    #[test]
    fn long_date_format() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();
        assert_eq!(long_date(&ts), "May 1, 2024");
        let ts = Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(long_date(&ts), "December 25, 2023");
    }

    #[test]
    fn exactly_one_day_is_one() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        assert_eq!(member_days(&(now - Duration::hours(24)), &now), 1);
    }

    #[test]
    fn partial_days_round_up() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        assert_eq!(member_days(&(now - Duration::hours(25)), &now), 2);
        assert_eq!(member_days(&(now - Duration::milliseconds(1)), &now), 1);
        assert_eq!(member_days(&now, &now), 0);
    }

    #[test]
    fn future_created_at_uses_absolute_difference() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        assert_eq!(member_days(&(now + Duration::hours(36)), &now), 2);
    }
}
