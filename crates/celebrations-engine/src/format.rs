//! Text helpers shared by the handlers.

use chrono::{Datelike, NaiveDate};

/// Whole years between `date` and `today`, by year subtraction only.
///
/// The day of year is ignored, so this is one too high before the
/// anniversary of `date` has passed in `today`'s year.
pub fn years_since(date: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - date.year()
}

/// "1 year" for exactly one, "<n> years" otherwise.
pub fn years_text(years: i32) -> String {
    if years == 1 {
        "1 year".to_string()
    } else {
        format!("{years} years")
    }
}

/// "2 January" style day-and-month label.
pub fn day_month(date: NaiveDate) -> String {
    date.format("%-d %B").to_string()
}

/// Slack user mention markup.
pub fn mention(member_id: &str) -> String {
    format!("<@{member_id}>")
}
