// src/format/dates.rs

use regex::Regex;
use std::sync::LazyLock;
use time::{Date, OffsetDateTime};
use tracing::debug;

/// Month abbreviations as typed into the form, January first.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Token used in filenames when the billing date cannot be read.
pub const FALLBACK_TOKEN: &str = "00.00.00";

/// Length of a fully typed `DD/Mon/YYYY` date.
const FULL_ENTRY_LEN: usize = 10;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("static regex"));

/// Turn `DD/Mon/YYYY` into the compact `DD.MM.YY` used in filenames.
///
/// Unknown month abbreviations map to `01`. Input that does not split into
/// exactly three `/`-separated parts yields [`FALLBACK_TOKEN`].
pub fn compact_date_token(date: &str) -> String {
    let parts: Vec<&str> = date.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return FALLBACK_TOKEN.to_string();
    };

    let month = month_number(month).map_or_else(|| "01".to_string(), |m| format!("{m:02}"));
    format!("{day:0>2}.{month}.{}", last_chars(year, 2))
}

/// `DD/Mon/YYYY` as printed on the documents: `DD-Mon-YYYY`.
pub fn report_date(date: &str) -> String {
    if date.split('/').count() == 3 {
        date.replace('/', "-")
    } else {
        date.to_string()
    }
}

/// Calendar date in the form's entry format, e.g. `05/Mar/2025`.
pub fn format_entry_date(date: Date) -> String {
    let month = MONTHS[usize::from(u8::from(date.month())) - 1];
    format!("{:02}/{month}/{}", date.day(), date.year())
}

/// Today's local date in entry format; the default billing date.
///
/// Falls back to UTC when the local offset cannot be determined.
pub fn today_entry_date() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|e| {
        debug!(error = %e, "Local offset unavailable, using UTC");
        OffsetDateTime::now_utc()
    });
    format_entry_date(now.date())
}

/// Re-mask raw date-field text after a keystroke.
///
/// Month names are swapped for their numbers and everything but digits is
/// dropped. The first two digits are the day (clamped to 01..=31), the next
/// two the month (clamped to 1..=12 and shown as its abbreviation) and up to
/// four more the year. Typing `0103` gives `01/Mar/`.
pub fn normalize_date_keystrokes(input: &str) -> String {
    let mut numbered = input.to_string();
    for (idx, month) in MONTHS.iter().enumerate() {
        numbered = numbered.replace(month, &format!("{:02}", idx + 1));
    }
    let digits = NON_DIGIT.replace_all(&numbered, "").into_owned();

    let day = char_slice(&digits, 0, 2);
    let month = char_slice(&digits, 2, 4);
    let year = char_slice(&digits, 4, 8);

    let mut result = if day.len() == 2 {
        match day.parse::<u32>() {
            Ok(0) => "01".to_string(),
            Ok(d) if d > 31 => "31".to_string(),
            _ => day.to_string(),
        }
    } else {
        day.to_string()
    };
    if day.len() == 2 {
        result.push('/');
    }

    if month.len() == 2 {
        let m = month.parse::<usize>().unwrap_or(1).clamp(1, 12);
        result.push_str(MONTHS[m - 1]);
        result.push('/');
    } else {
        result.push_str(month);
    }

    result.push_str(year);
    result
}

/// Expand a two-digit year when the date field loses focus: `01/Jan/25`
/// becomes `01/Jan/2025`.
pub fn expand_two_digit_year(date: &str) -> String {
    let parts: Vec<&str> = date.split('/').collect();
    match parts.as_slice() {
        [day, month, year] if year.chars().count() == 2 => format!("{day}/{month}/20{year}"),
        _ => date.to_string(),
    }
}

/// Whether Enter may move focus out of a date field holding `date`.
pub fn date_entry_complete(date: &str) -> bool {
    let len = date.chars().count();
    len == 0 || len >= FULL_ENTRY_LEN
}

/// 1-based month number for a three-letter abbreviation.
fn month_number(abbrev: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == abbrev).map(|idx| idx + 1)
}

fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    match s.char_indices().nth(count.saturating_sub(n)) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let begin = s.char_indices().nth(start).map_or(s.len(), |(i, _)| i);
    let finish = s.char_indices().nth(end).map_or(s.len(), |(i, _)| i);
    &s[begin..finish]
}
