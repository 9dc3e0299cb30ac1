// src/format/words.rs

use super::currency::scaled_round;
use tracing::warn;

const ONES: [&str; 10] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];
const TEENS: [&str; 10] = [
    "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
    "eighteen", "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Scale words from largest to smallest, with their divisor.
const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Literal returned for an amount that rounds to nothing.
pub const ZERO_DOLLARS: &str = "Zero dollars";

/// Spell out a currency amount for the "In Words" line of a bill.
///
/// `21.5` becomes `"Twenty-one dollars and fifty cents."`. Cents are rounded,
/// and a fractional part that rounds up to 100 cents carries into the dollars.
///
/// The amount is expected to be finite and non-negative. Negative amounts are
/// prefixed with `"Minus "`; NaN and infinities are logged and spelled as zero.
pub fn amount_to_words(amount: f64) -> String {
    if !amount.is_finite() {
        warn!(amount, "Non-finite amount cannot be spelled out");
        return ZERO_DOLLARS.to_string();
    }
    if amount < 0.0 {
        let positive = amount_to_words(-amount);
        return format!("Minus {}", lowercase_first(&positive));
    }

    let (dollars, cents) = split_amount(amount);
    if dollars == 0 && cents == 0 {
        return ZERO_DOLLARS.to_string();
    }

    let words = if dollars == 0 {
        "zero".to_string()
    } else {
        integer_words(dollars)
    };
    let unit = if dollars == 1 { "dollar" } else { "dollars" };
    let mut sentence = format!("{} {unit}", uppercase_first(&words));

    if cents > 0 {
        let cent_unit = if cents == 1 { "cent" } else { "cents" };
        sentence.push_str(&format!(" and {} {cent_unit}", group_words(cents as u16)));
    }

    sentence.push('.');
    sentence
}

/// Whole dollars and cents of a non-negative amount rounded to the cent, so
/// `19.999` is `(20, 0)`.
fn split_amount(amount: f64) -> (u64, u64) {
    let cents = scaled_round(amount, 2);
    let dollars = (cents / 100.0).floor();
    let rest = (cents - dollars * 100.0).clamp(0.0, 99.0);
    (dollars as u64, rest as u64)
}

/// Words for a positive integer, scale groups joined by ", ".
fn integer_words(mut n: u64) -> String {
    let mut groups = Vec::new();

    for (divisor, name) in SCALES {
        if n >= divisor {
            let count = n / divisor;
            // Anything past the top scale still reads as "<n> trillion".
            let count_words = if count >= 1000 {
                integer_words(count)
            } else {
                group_words(count as u16)
            };
            groups.push(format!("{count_words} {name}"));
            n %= divisor;
        }
    }

    if n > 0 {
        groups.push(group_words(n as u16));
    }

    groups.join(", ")
}

/// Words for a 1-3 digit group; an empty string for 0.
fn group_words(n: u16) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(2);
    let hundreds = usize::from(n / 100);
    let rest = usize::from(n % 100);

    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds]));
    }

    match rest {
        0 => {}
        1..=9 => parts.push(ONES[rest].to_string()),
        10..=19 => parts.push(TEENS[rest - 10].to_string()),
        _ if rest % 10 == 0 => parts.push(TENS[rest / 10].to_string()),
        _ => parts.push(format!("{}-{}", TENS[rest / 10], ONES[rest % 10])),
    }

    parts.join(" ")
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
