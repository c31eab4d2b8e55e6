//! Monthly date windows for sitemap crawling
//!
//! The sitemap endpoint returns a bounded result per call, so the full time
//! range is walked one month at a time. Windows are half-open: a window's
//! `to` date equals the next window's `from` date.

use chrono::{Datelike, NaiveDate};

/// A half-open date window `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Generate contiguous monthly windows from `start_year`-01-01 through `until`
///
/// The last window is the month containing `until`, so coverage always
/// reaches the current date. Windows are returned in chronological order.
pub fn monthly_windows(start_year: i32, until: NaiveDate) -> Vec<DateWindow> {
    let mut windows = Vec::new();
    let Some(mut current) = NaiveDate::from_ymd_opt(start_year, 1, 1) else {
        return windows;
    };

    while current <= until {
        let next = first_of_next_month(current);
        windows.push(DateWindow {
            from: current,
            to: next,
        });
        current = next;
    }

    windows
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // Day 1 of a month in [1, 12] always exists
    NaiveDate::from_ymd_opt(year, month, 1).expect("first day of month")
}
