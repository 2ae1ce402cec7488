//! Positional message templating.
//!
//! Implements the `%s`/`%d`-style substitution used by
//! [`Descriptor::format`](crate::Descriptor::format) and the builder's
//! message-formatting methods, as well as by template-based code generators.
//!
//! | Placeholder      | Rendering                                   |
//! |------------------|---------------------------------------------|
//! | `%s`             | strings verbatim, anything else as JSON     |
//! |                  | (objects compact, not inspect-style)        |
//! | `%d`             | numeric conversion (`NaN` when impossible)  |
//! | `%i`             | integer conversion (truncates)              |
//! | `%f`             | floating point conversion                   |
//! | `%j` `%o` `%O`   | JSON                                        |
//! | `%c`             | consumes an argument, renders nothing       |
//! | `%%`             | a literal `%`                               |
//!
//! A placeholder with no argument left is kept verbatim. Surplus arguments
//! are appended, separated by single spaces, objects again as compact JSON.
//! Integers render with every digit. A template formatted with no
//! arguments at all is returned untouched.

use serde_json::Value;

/// Substitutes `args` into `template` positionally.
pub fn format_message(template: &str, args: &[Value]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut remaining = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('%');
            break;
        };
        if next == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !matches!(next, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c') {
            out.push('%');
            continue;
        }
        match remaining.next() {
            Some(arg) => {
                chars.next();
                out.push_str(&render_placeholder(next, arg));
            }
            None => {
                // Keep the placeholder verbatim.
                out.push('%');
            }
        }
    }

    for arg in remaining {
        out.push(' ');
        out.push_str(&render_string(arg));
    }

    out
}

fn render_placeholder(kind: char, arg: &Value) -> String {
    if matches!(kind, 's' | 'd' | 'i' | 'f') {
        if let Some(exact) = exact_integer(arg) {
            return exact;
        }
    }
    match kind {
        's' => render_string(arg),
        'd' => js_number(to_number(arg)),
        'i' => js_number(to_integer(arg)),
        'f' => js_number(to_float(arg)),
        'c' => String::new(),
        _ => render_json(arg),
    }
}

/// Integers keep every digit; going through `f64` would round past 2^53.
fn exact_integer(arg: &Value) -> Option<String> {
    match arg {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

fn render_string(arg: &Value) -> String {
    if let Some(exact) = exact_integer(arg) {
        return exact;
    }
    match arg {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(js_number).unwrap_or_else(|| n.to_string()),
        other => render_json(other),
    }
}

fn render_json(arg: &Value) -> String {
    serde_json::to_string(arg).unwrap_or_else(|_| String::from("undefined"))
}

fn to_number(arg: &Value) -> f64 {
    match arg {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

fn to_integer(arg: &Value) -> f64 {
    match arg {
        Value::Number(n) => n.as_f64().map(f64::trunc).unwrap_or(f64::NAN),
        Value::String(s) => leading_number(s.trim_start(), false).trunc(),
        _ => f64::NAN,
    }
}

fn to_float(arg: &Value) -> f64 {
    match arg {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => leading_number(s.trim_start(), true),
        _ => f64::NAN,
    }
}

/// Parses the longest numeric prefix of `s`, or NaN if there is none.
fn leading_number(s: &str, allow_fraction: bool) -> f64 {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, c) in s.char_indices() {
        match c {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }
    if !seen_digit {
        return f64::NAN;
    }
    s.get(..end)
        .and_then(|prefix| prefix.trim_end_matches('.').parse().ok())
        .unwrap_or(f64::NAN)
}

/// Renders a number the way the host's number-to-string conversion does:
/// integral values without a fractional part.
fn js_number(n: f64) -> String {
    if n.is_nan() {
        return String::from("NaN");
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_placeholder() {
        assert_eq!(format_message("How are you %s?", &[json!("foo")]), "How are you foo?");
    }

    #[test]
    fn test_numeric_placeholders() {
        assert_eq!(format_message("WOO_%d", &[json!(1)]), "WOO_1");
        assert_eq!(format_message("%d", &[json!(1.5)]), "1.5");
        assert_eq!(format_message("%d", &[json!("abc")]), "NaN");
        assert_eq!(format_message("%i", &[json!("42px")]), "42");
        assert_eq!(format_message("%f", &[json!("3.25rem")]), "3.25");
    }

    #[test]
    fn test_large_integers_are_exact() {
        let big = (1_i64 << 53) + 1;
        assert_eq!(format_message("%d", &[json!(big)]), big.to_string());
        assert_eq!(format_message("%s", &[json!(i64::MAX)]), i64::MAX.to_string());
        assert_eq!(format_message("%i", &[json!(u64::MAX)]), u64::MAX.to_string());
        assert_eq!(format_message("n", &[json!(i64::MIN)]), format!("n {}", i64::MIN));
    }

    #[test]
    fn test_json_placeholder() {
        assert_eq!(
            format_message("payload %j", &[json!({"id": 7})]),
            "payload {\"id\":7}"
        );
    }

    #[test]
    fn test_missing_argument_keeps_placeholder() {
        assert_eq!(format_message("%s and %s", &[json!("a")]), "a and %s");
    }

    #[test]
    fn test_surplus_arguments_are_appended() {
        assert_eq!(format_message("code", &[json!(1), json!("x")]), "code 1 x");
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(format_message("100%% of %s", &[json!("it")]), "100% of it");
        assert_eq!(format_message("100%%", &[]), "100%%");
    }

    #[test]
    fn test_unknown_placeholder_is_literal() {
        assert_eq!(format_message("%x %s", &[json!("y")]), "%x y");
    }
}
