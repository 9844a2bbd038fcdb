//! Textual parsers for built-in value types.

use std::time::Duration;

use uuid::Uuid;

use crate::messages::Messages;

/// A value that can be parsed from a single token
pub trait ArgValue: Sized {
    /// Name used for the `{type}` placeholder
    const TYPE_NAME: &'static str;

    /// Parse one token; `None` means invalid
    fn parse_arg(raw: &str) -> Option<Self>;

    /// Template for the invalid message; `{arg}` is the raw token
    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_value
    }
}

impl ArgValue for String {
    const TYPE_NAME: &'static str = "text";

    fn parse_arg(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_string
    }
}

impl ArgValue for char {
    const TYPE_NAME: &'static str = "character";

    fn parse_arg(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_char
    }
}

impl ArgValue for Vec<char> {
    const TYPE_NAME: &'static str = "character sequence";

    fn parse_arg(raw: &str) -> Option<Self> {
        Some(raw.chars().collect())
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_chars
    }
}

impl ArgValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn parse_arg(raw: &str) -> Option<Self> {
        parse_bool(raw)
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_bool
    }
}

macro_rules! integer_values {
    ($($ty:ty => $name:literal, $field:ident;)*) => {
        $(
            impl ArgValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn parse_arg(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }

                fn invalid_template(messages: &Messages) -> &str {
                    &messages.$field
                }
            }
        )*
    };
}

integer_values! {
    i8 => "byte", invalid_byte;
    i16 => "short", invalid_short;
    i32 => "integer", invalid_int;
    i64 => "long", invalid_long;
}

// Non-finite spellings such as "NaN" and "inf" are rejected.
impl ArgValue for f32 {
    const TYPE_NAME: &'static str = "float";

    fn parse_arg(raw: &str) -> Option<Self> {
        raw.parse::<f32>().ok().filter(|v| v.is_finite())
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_float
    }
}

impl ArgValue for f64 {
    const TYPE_NAME: &'static str = "double";

    fn parse_arg(raw: &str) -> Option<Self> {
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_double
    }
}

impl ArgValue for Uuid {
    const TYPE_NAME: &'static str = "UUID";

    fn parse_arg(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok()
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_uuid
    }
}

impl ArgValue for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse_arg(raw: &str) -> Option<Self> {
        parse_duration(raw)
    }

    fn invalid_template(messages: &Messages) -> &str {
        &messages.invalid_duration
    }
}

/// Parse a boolean token
///
/// Accepts `true/yes/on/y/1` and `false/no/off/n/0`, case-insensitively.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "y" | "1" => Some(true),
        "false" | "no" | "off" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a duration token such as `30s`, `5m`, `1h30m`, `2d` or bare seconds
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim().to_ascii_lowercase();
    if raw.is_empty() {
        return None;
    }
    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let mut total = Duration::ZERO;
    let mut digits = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return None;
        }
        let amount: u64 = digits.parse().ok()?;
        digits.clear();
        let unit = match c {
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                Duration::from_millis(amount)
            }
            's' => Duration::from_secs(amount),
            'm' => Duration::from_secs(amount.checked_mul(60)?),
            'h' => Duration::from_secs(amount.checked_mul(3_600)?),
            'd' => Duration::from_secs(amount.checked_mul(86_400)?),
            'w' => Duration::from_secs(amount.checked_mul(604_800)?),
            _ => return None,
        };
        total = total.checked_add(unit)?;
    }

    // Trailing number without a unit ("1h30")
    if !digits.is_empty() {
        return None;
    }
    Some(total)
}
