//! Component naming rules.
//!
//! Component names are PascalCase (`AcquireTime`) or, for enumerated rows,
//! plain digits. Labels shown on screens are derived from the name by
//! splitting it back into words.

/// Returns `true` if `name` matches `^([A-Z][a-z0-9]*)*$`.
#[must_use]
pub fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_none_or(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Returns `true` if `name` matches `^\d*$`.
#[must_use]
pub fn is_number(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_digit())
}

/// Returns `true` if `name` is acceptable as a component name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    is_pascal_case(name) || is_number(name)
}

/// Makes `name` PascalCase with the smallest possible change.
///
/// Valid names are returned unchanged. Otherwise every character that is not
/// an ASCII letter or digit is removed and the first character upper-cased, so
/// `Gain_RBV` becomes `GainRBV` and `acquire` becomes `Acquire`.
#[must_use]
pub fn enforce_pascal_case(name: &str) -> String {
    if is_pascal_case(name) {
        return name.to_string();
    }

    let mut chars = name.chars().filter(char::is_ascii_alphanumeric);
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.collect::<String>(),
        None => String::new(),
    }
}

/// Splits a PascalCase name into space separated words.
///
/// A word starts at an upper-case letter that follows a non upper-case
/// character, at an upper-case letter followed by a lower-case one, and at a
/// digit that follows a lower-case letter:
/// `AcquireTime` → `Acquire Time`, `PVIName` → `PVI Name`, `Gain2` → `Gain 2`.
#[must_use]
pub fn to_title_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    let mut index = 0;
    while index < chars.len() {
        let c = chars[index];
        let previous = index.checked_sub(1).map(|i| chars[i]);
        let next = chars.get(index + 1).copied();

        if c.is_ascii_uppercase() && !previous.is_some_and(|p| p.is_ascii_uppercase()) {
            out.push(' ');
            out.push(c);
        } else if c.is_ascii_uppercase()
            && next.is_some_and(|n| n.is_ascii_lowercase() || n == '/')
        {
            out.push(' ');
            out.push(c);
            out.extend(next);
            index += 1;
        } else if c.is_ascii_digit() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
        index += 1;
    }

    out.strip_prefix(' ').map_or(out.clone(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pascal_case() {
        assert!(is_pascal_case("AcquireTime"));
        assert!(is_pascal_case("PVI"));
        assert!(is_pascal_case("Gain2"));
        assert!(is_pascal_case(""));
        assert!(!is_pascal_case("acquireTime"));
        assert!(!is_pascal_case("Gain_RBV"));
        assert!(!is_pascal_case("2Gain"));
    }

    #[test]
    fn test_valid_names_allow_numbers() {
        assert!(is_valid_name("12"));
        assert!(is_valid_name("Roi"));
        assert!(!is_valid_name("1a"));
    }

    #[test]
    fn test_enforce_pascal_case() {
        assert_eq!(enforce_pascal_case("AcquireTime"), "AcquireTime");
        assert_eq!(enforce_pascal_case("Gain_RBV"), "GainRBV");
        assert_eq!(enforce_pascal_case("file_path"), "Filepath");
        assert_eq!(enforce_pascal_case("acquire"), "Acquire");
        assert_eq!(enforce_pascal_case("__"), "");
    }

    #[test]
    fn test_to_title_case() {
        assert_eq!(to_title_case("AcquireTime"), "Acquire Time");
        assert_eq!(to_title_case("PVIName"), "PVI Name");
        assert_eq!(to_title_case("Gain2"), "Gain 2");
        assert_eq!(to_title_case("ArrayCounter"), "Array Counter");
        assert_eq!(to_title_case("NDArrayPort"), "ND Array Port");
        assert_eq!(to_title_case("X"), "X");
        assert_eq!(to_title_case(""), "");
    }
}
