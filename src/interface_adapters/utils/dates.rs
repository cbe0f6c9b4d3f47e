// Date strings as the views show them. Inputs are the compact forms the API
// sends (`YYYYMMDD`, `YYYYMMDDHHmm`); short inputs yield short output, never a panic.

use time::macros::time;
use time::{Date, Duration, Month, OffsetDateTime};

const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

// Character range clamped to the input, bounds swapped when reversed.
fn slice(text: &str, start: usize, end: usize) -> String {
    let len = text.chars().count();
    let (start, end) = (start.min(len), end.min(len));
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    text.chars().skip(start).take(end - start).collect()
}

pub fn today_compact(now: OffsetDateTime) -> String {
    format!("{:04}{:02}{:02}", now.year(), u8::from(now.month()), now.day())
}

pub fn now_compact(now: OffsetDateTime) -> String {
    format!(
        "{}{:02}{:02}{:02}",
        today_compact(now),
        now.hour(),
        now.minute(),
        now.second()
    )
}

pub fn today_month_day(now: OffsetDateTime) -> String {
    format!("{:02}/{:02}", u8::from(now.month()), now.day())
}

// `YYYYMMDD` -> `YYYY/MM/DD`
pub fn format_date(date: &str) -> String {
    format!(
        "{}/{}/{}",
        slice(date, 0, 4),
        slice(date, 4, 6),
        slice(date, 6, 8)
    )
}

// `YYYY-MM-DD HH:MM:SS[.fff]` -> `YYYY/MM/DD HH:MM:SS`
pub fn format_datetime(datetime: &str) -> Option<String> {
    let (date, clock) = datetime.split_once(' ')?;
    let mut date = date.split('-');
    let mut clock = clock.split(':');
    let (year, month, day) = (date.next()?, date.next()?, date.next()?);
    let (hour, minute, second) = (clock.next()?, clock.next()?, clock.next()?);
    Some(format!(
        "{year}/{month}/{day} {hour}:{minute}:{}",
        slice(second, 0, 2)
    ))
}

// `YYYY/MM/DD` -> `YYYYMMDD`
pub fn strip_slashes(date: &str) -> String {
    date.replace('/', "")
}

pub fn month_day(date: &str) -> String {
    format!("{}/{}", slice(date, 4, 6), slice(date, 6, 8))
}

pub fn month_day_jp(date: &str) -> String {
    format!("{}月{}日", slice(date, 4, 6), slice(date, 6, 8))
}

pub fn full_date_jp(date: &str) -> String {
    format!(
        "{}年{}月{}日",
        slice(date, 0, 4),
        slice(date, 4, 6),
        slice(date, 6, 8)
    )
}

// `YYYYMMDDHHmm` -> `HH:mm`
pub fn hour_minute(datetime: &str) -> String {
    format!("{}:{}", slice(datetime, 8, 10), slice(datetime, 10, 12))
}

// `YYYYMMDD` -> `(曜)`, None for a date that does not exist.
pub fn weekday_label(date: &str) -> Option<String> {
    let year: i32 = slice(date, 0, 4).parse().ok()?;
    let month: u8 = slice(date, 4, 6).parse().ok()?;
    let day: u8 = slice(date, 6, 8).parse().ok()?;
    let date = Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;
    let index = date.weekday().number_days_from_sunday() as usize;
    Some(format!("({})", WEEKDAYS[index]))
}

// `YYYYMMDDHHmm` -> `YYYY/MM/DD HH:mm`
pub fn datetime_minutes(datetime: &str) -> String {
    format!("{} {}", format_date(datetime), hour_minute(datetime))
}

// Expiry `YYYYMM` or `YYYYMMDD` -> `YYYY.MM[.DD]`; anything else is empty.
pub fn expiry_label(raw: &str) -> String {
    let expiry = raw.trim();
    match expiry.chars().count() {
        8 => format!(
            "{}.{}.{}",
            slice(expiry, 0, 4),
            slice(expiry, 4, 6),
            slice(expiry, 6, 8)
        ),
        6 => format!("{}.{}", slice(expiry, 0, 4), slice(expiry, 4, 6)),
        _ => String::new(),
    }
}

// Display form `yyyy/MM/dd(曜)hh:mm` back to `yyyyMMddhhmm`.
pub fn unformat_display_datetime(display: &str) -> String {
    [(0, 4), (5, 7), (8, 10), (13, 15), (16, 18)]
        .iter()
        .map(|&(start, end)| slice(display, start, end))
        .collect()
}

// Friday of the current Sunday-based week, 19:00 in the same offset.
pub fn this_friday_evening(now: OffsetDateTime) -> OffsetDateTime {
    let since_sunday = i64::from(now.weekday().number_days_from_sunday());
    (now + Duration::days(5 - since_sunday)).replace_time(time!(19:00))
}
