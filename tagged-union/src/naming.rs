//! Snake-case naming policy applied to field names on the wire.

use std::borrow::Cow;

/// Converts an identifier to `snake_case`.
///
/// - A lowercase letter or digit followed by an uppercase letter starts a new
///   segment (`accountHolder` -> `account_holder`, `line2Name` -> `line2_name`).
/// - A run of uppercase letters followed by a lowercase letter splits before
///   the last uppercase letter (`URLValue` -> `url_value`, `IPhone` -> `i_phone`).
/// - Digits stay attached to the segment they follow.
/// - `-`, `_` and spaces become a single `_`.
///
/// Empty and whitespace-only input is returned unchanged, and so is input that
/// is already snake case, which makes the conversion idempotent.
pub fn to_snake_case(input: &str) -> Cow<'_, str> {
    if input.trim().is_empty() || is_snake_case(input) {
        return Cow::Borrowed(input);
    }

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

/// [`to_snake_case`] lifted over an optional identifier; `None` stays `None`.
pub fn to_snake_case_opt(input: Option<&str>) -> Option<Cow<'_, str>> {
    input.map(to_snake_case)
}

fn is_snake_case(s: &str) -> bool {
    !s.contains("__")
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
