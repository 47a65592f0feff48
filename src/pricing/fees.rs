use chrono::{DateTime, Utc};

/// One-time registration fee, re-charged once a membership year has lapsed.
pub const REGISTRATION_FEE: i64 = 300;

const FEE_WINDOW_DAYS: i64 = 365;

/// Whether the registration fee is due at `now`. A member with no
/// registration date has never paid the fee. Otherwise the window is
/// anchored at the most recent package payment, falling back to the
/// registration date, and is strict: exactly 365 elapsed days is still
/// covered, day 366 is not.
pub fn is_registration_fee_due(
    registration_date: Option<DateTime<Utc>>,
    last_package_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    let registered = match registration_date {
        Some(registered) => registered,
        None => return true,
    };
    let anchor = last_package_date.unwrap_or(registered);
    let elapsed_days = (now - anchor).num_days();
    elapsed_days > FEE_WINDOW_DAYS
}

/// Fee amount for the quote: the flat fee when due, zero otherwise.
pub fn registration_fee(
    registration_date: Option<DateTime<Utc>>,
    last_package_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    if is_registration_fee_due(registration_date, last_package_date, now) {
        REGISTRATION_FEE
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn never_registered_owes_the_fee() {
        assert!(is_registration_fee_due(None, None, at(2025, 6, 1)));
        assert_eq!(registration_fee(None, None, at(2025, 6, 1)), REGISTRATION_FEE);
        // a package date without a registration date never vouches for the fee
        let recent = Some(at(2025, 5, 1));
        assert!(is_registration_fee_due(None, recent, at(2025, 6, 1)));
    }

    #[test]
    fn window_boundaries_are_strict() {
        let now = at(2025, 6, 1);
        let days_ago = |d: i64| Some(now - Duration::days(d));

        assert!(!is_registration_fee_due(days_ago(364), None, now));
        assert!(!is_registration_fee_due(days_ago(365), None, now));
        assert!(is_registration_fee_due(days_ago(366), None, now));
    }

    #[test]
    fn partial_day_elapsed_counts_as_the_lower_day() {
        let now = at(2025, 6, 1);
        // 365 days and 11 hours ago: floor is 365, still covered
        let anchor = now - Duration::days(365) - Duration::hours(11);
        assert!(!is_registration_fee_due(Some(anchor), None, now));
    }

    #[test]
    fn last_package_date_resets_the_window() {
        let now = at(2025, 6, 1);
        let registered = Some(now - Duration::days(700));
        let paid = Some(now - Duration::days(30));
        assert!(is_registration_fee_due(registered, None, now));
        assert!(!is_registration_fee_due(registered, paid, now));
        assert_eq!(registration_fee(registered, paid, now), 0);
    }
}
