// src/format/mod.rs

//! Text helpers that feed literal fields of the generated documents: the
//! amount in words, date tokens and currency strings. Everything here is pure
//! and never fails; bad input degrades to a documented fallback.

pub mod currency;
pub mod dates;
pub mod words;

pub use currency::{format_currency, format_fixed, format_grouped, format_quantity, scaled_round};
pub use dates::{
    FALLBACK_TOKEN, MONTHS, compact_date_token, date_entry_complete, expand_two_digit_year,
    format_entry_date, normalize_date_keystrokes, report_date, today_entry_date,
};
pub use words::{ZERO_DOLLARS, amount_to_words};
