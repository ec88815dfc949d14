use chrono::{Datelike, Duration, Local, NaiveDate};

/// Source of the current calendar day. The engine takes every reference
/// date as a parameter; this trait is how production code obtains "today"
/// without the core hiding a wall-clock dependency.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date, for tests and offline evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The most recent Sunday on or before `date`. Weeks start on Sunday.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

pub fn is_same_week(a: NaiveDate, b: NaiveDate) -> bool {
    start_of_week(a) == start_of_week(b)
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn week_starts_on_the_preceding_sunday() {
        // 2025-07-23 is a Wednesday; its week began on Sunday the 20th.
        assert_eq!(start_of_week(date(2025, 7, 23)), date(2025, 7, 20));
        assert_eq!(start_of_week(date(2025, 7, 20)), date(2025, 7, 20));
        assert_eq!(start_of_week(date(2025, 7, 26)), date(2025, 7, 20));
    }

    #[test]
    fn same_week_is_sunday_aligned() {
        assert!(is_same_week(date(2025, 7, 20), date(2025, 7, 26)));
        assert!(is_same_week(date(2025, 7, 23), date(2025, 7, 21)));
        // Saturday and the following Sunday fall in different weeks.
        assert!(!is_same_week(date(2025, 7, 26), date(2025, 7, 27)));
    }

    #[test]
    fn same_week_spans_month_boundaries() {
        // Sunday 2025-06-29 and Wednesday 2025-07-02 share a week.
        assert!(is_same_week(date(2025, 6, 29), date(2025, 7, 2)));
        assert!(!is_same_month(date(2025, 6, 29), date(2025, 7, 2)));
    }

    #[test]
    fn same_month_requires_year_and_month() {
        assert!(is_same_month(date(2025, 7, 1), date(2025, 7, 31)));
        assert!(!is_same_month(date(2025, 7, 15), date(2025, 8, 15)));
        assert!(!is_same_month(date(2024, 7, 15), date(2025, 7, 15)));
    }

    #[test]
    fn fixed_clock_reports_its_date() {
        let clock = FixedClock(date(2025, 7, 21));
        assert_eq!(clock.today(), date(2025, 7, 21));
    }
}
