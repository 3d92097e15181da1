//! Text helpers shared by the query layer and the renderers.

/// Literal written wherever a record field is absent.
pub const UNDEFINED: &str = "undefined";

/// Parse the longest numeric prefix of `text` as a float.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12abc"`
/// is `12.0` and `"1990,1994"` is `1990.0`. Text without a numeric prefix
/// yields `f64::NAN`.
pub fn parse_leading_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let unsigned = &trimmed[end..];
    if unsigned.starts_with("Infinity") {
        return trimmed[..end + "Infinity".len()]
            .parse()
            .unwrap_or(f64::NAN);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse().unwrap_or(f64::NAN)
}

/// Render an optional value, falling back to [`UNDEFINED`].
pub fn or_undefined<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => UNDEFINED.to_string(),
    }
}
