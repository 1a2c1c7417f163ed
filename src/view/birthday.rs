//! Birthday parsing and display.

use chrono::{Datelike, NaiveDate};

/// Accepted birthday layouts with the byte offsets of their separators.
const BIRTHDAY_FORMATS: [(&str, u8, [usize; 2]); 2] =
    [("%Y-%m-%d", b'-', [4, 7]), ("%d.%m.%Y", b'.', [2, 5])];

/// Shown in place of a birthday that cannot be parsed.
pub const UNKNOWN_BIRTHDAY: &str = "Н/Д";

/// Parse a birthday in `YYYY-MM-DD` or `DD.MM.YYYY` form.
///
/// Parsing is strict: every field must be zero-padded to its full width, and
/// out-of-range days or months yield `None`.
pub fn parse_birthday(birthday: &str) -> Option<NaiveDate> {
    let birthday = birthday.trim();

    BIRTHDAY_FORMATS
        .iter()
        .filter(|(_, separator, positions)| has_layout(birthday, *separator, positions))
        .find_map(|(format, _, _)| NaiveDate::parse_from_str(birthday, format).ok())
}

/// Ten ASCII bytes: digits everywhere except `separator` at `positions`.
fn has_layout(s: &str, separator: u8, positions: &[usize; 2]) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| {
            if positions.contains(&i) {
                b == separator
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Format a birthday as `DD.MM.YYYY`.
pub fn format_birthday(birthday: &str) -> String {
    match parse_birthday(birthday) {
        Some(date) => date.format("%d.%m.%Y").to_string(),
        None => UNKNOWN_BIRTHDAY.to_string(),
    }
}

/// Age in full years on `today`; 0 when the birthday cannot be parsed.
pub fn age_on(birthday: &str, today: NaiveDate) -> u32 {
    let Some(born) = parse_birthday(birthday) else {
        return 0;
    };

    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age.max(0) as u32
}
