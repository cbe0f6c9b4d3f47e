use time::{Date, Duration, Month, OffsetDateTime};

// Attribute names kept in the session store.
pub mod keys {
    pub const AUTH_TOKEN: &str = "AuthToken";
    pub const XSRF_TOKEN: &str = "XSRF-TOKEN";
    pub const REQUEST_PARAMETER_R: &str = "r";
    // 0: field user, 1: head-office user.
    pub const HONBU_FLAG: &str = "honbu_flag";
    pub const MOVE_URL: &str = "MoveURL";
    pub const PASSWORD_CHANGE_URL: &str = "PasswordChangeURL";
    pub const LOGOUT_URL: &str = "LogoutURL";
}

// Value of the head-office flag that marks a head-office user.
pub const HEAD_OFFICE_FLAG: &str = "1";

// Renewed to the short lifetime after every call.
pub const SHORT_RENEWAL_KEYS: [&str; 3] = [
    keys::HONBU_FLAG,
    keys::REQUEST_PARAMETER_R,
    keys::PASSWORD_CHANGE_URL,
];

// Renewed to the long lifetime after every call.
pub const LONG_RENEWAL_KEYS: [&str; 2] = [keys::MOVE_URL, keys::LOGOUT_URL];

// One minute longer than the upstream auth token's 30 minutes.
pub const SHORT_LIFETIME: Duration = Duration::minutes(31);
pub const LONG_LIFETIME: Duration = Duration::days(1);

// Expiry class of a session attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    Short,
    Long,
    // Outside the renewal cycle, e.g. persistent preference flags.
    Month,
}

impl Lifetime {
    // Absolute expiry measured from `now`, never from a previous expiry.
    pub fn expires_at(self, now: OffsetDateTime) -> OffsetDateTime {
        match self {
            Lifetime::Short => now + SHORT_LIFETIME,
            Lifetime::Long => now + LONG_LIFETIME,
            Lifetime::Month => one_month_after(now),
        }
    }
}

// Same day next month, clamped to the last day when the month is shorter.
fn one_month_after(now: OffsetDateTime) -> OffsetDateTime {
    let (year, month) = match now.month() {
        Month::December => (now.year() + 1, Month::January),
        month => (now.year(), month.next()),
    };
    let date = (1..=now.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap_or_else(|| now.date());
    now.replace_date(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn when_lifetime_is_short_then_expiry_is_31_minutes_out() {
        let now = datetime!(2025-02-07 10:00 UTC);
        assert_eq!(Lifetime::Short.expires_at(now), datetime!(2025-02-07 10:31 UTC));
    }

    #[test]
    fn when_lifetime_is_long_then_expiry_is_one_day_out() {
        let now = datetime!(2025-02-07 23:30 UTC);
        assert_eq!(Lifetime::Long.expires_at(now), datetime!(2025-02-08 23:30 UTC));
    }

    #[test]
    fn when_lifetime_is_month_then_expiry_keeps_day_and_time() {
        let now = datetime!(2025-02-07 08:15 UTC);
        assert_eq!(Lifetime::Month.expires_at(now), datetime!(2025-03-07 08:15 UTC));
    }

    #[test]
    fn when_next_month_is_shorter_then_expiry_clamps_to_its_last_day() {
        let now = datetime!(2025-01-31 12:00 UTC);
        assert_eq!(Lifetime::Month.expires_at(now), datetime!(2025-02-28 12:00 UTC));
    }

    #[test]
    fn when_month_is_december_then_expiry_rolls_into_next_year() {
        let now = datetime!(2025-12-15 00:00 UTC);
        assert_eq!(Lifetime::Month.expires_at(now), datetime!(2026-01-15 00:00 UTC));
    }
}
