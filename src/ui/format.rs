//! Russian date formatting for transaction timestamps.

use time::{
    Date, Month, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::transaction::TIMESTAMP_FORMAT;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Format a stored timestamp such as "2019-03-10 03:20:41" for display,
/// e.g. "10 марта 2019 г. в 03:20".
///
/// The date and time may also be separated by a "T". A date on its own,
/// e.g. "2019-03-10", is shown at midnight. Anything after the seconds, like
/// fractional seconds or a UTC offset, is ignored: the time is shown as
/// written and is not converted to another timezone.
///
/// Returns `None` if `date` is empty or is not a timestamp.
pub fn format_date(date: &str) -> Option<String> {
    let date = date.trim();

    if date.is_empty() {
        return None;
    }

    let timestamp = if date.len() == 10 {
        Date::parse(date, DATE_FORMAT).map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
    } else {
        let date = date.replacen('T', " ", 1);
        PrimitiveDateTime::parse(date.get(..19)?, TIMESTAMP_FORMAT)
    };

    timestamp
        .inspect_err(|error| tracing::debug!("Could not parse timestamp {date:?}: {error}"))
        .ok()
        .map(format_timestamp)
}

/// Format `timestamp` as "DD <month> YYYY г. в HH:MM" with the month in the genitive case.
pub fn format_timestamp(timestamp: PrimitiveDateTime) -> String {
    format!(
        "{:02} {} {} г. в {:02}:{:02}",
        timestamp.day(),
        month_genitive(timestamp.month()),
        timestamp.year(),
        timestamp.hour(),
        timestamp.minute()
    )
}

fn month_genitive(month: Month) -> &'static str {
    match month {
        Month::January => "января",
        Month::February => "февраля",
        Month::March => "марта",
        Month::April => "апреля",
        Month::May => "мая",
        Month::June => "июня",
        Month::July => "июля",
        Month::August => "августа",
        Month::September => "сентября",
        Month::October => "октября",
        Month::November => "ноября",
        Month::December => "декабря",
    }
}
