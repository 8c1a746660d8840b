/// Parses an untrusted counter such as `statistics.viewCount`.
///
/// Never fails: absent, unparseable, negative and non-finite inputs all come
/// back as `0.0`. Fractions are kept as-is.
pub fn parse_count(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map_or(0.0, non_negative_finite)
}

/// Clamps anything negative (including `-0.0`), NaN or infinite to zero.
pub fn non_negative_finite(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_zero() {
        assert_eq!(parse_count(None), 0.0);
    }

    #[test]
    fn parses_plain_and_fractional_counts() {
        assert_eq!(parse_count(Some("1500")), 1500.0);
        assert_eq!(parse_count(Some("12.5")), 12.5);
        assert_eq!(parse_count(Some(" 42 ")), 42.0);
        assert_eq!(parse_count(Some("1e3")), 1000.0);
    }

    #[test]
    fn garbage_negative_and_non_finite_collapse_to_zero() {
        for raw in ["", "invalid-number", "-20", "NaN", "inf", "-inf", "1e400"] {
            assert_eq!(parse_count(Some(raw)), 0.0, "input {raw:?}");
        }
    }

    #[test]
    fn negative_zero_comes_back_positive() {
        let parsed = parse_count(Some("-0"));
        assert_eq!(parsed, 0.0);
        assert!(!parsed.is_sign_negative());
        assert!(!non_negative_finite(-0.0).is_sign_negative());
    }

    #[test]
    fn is_idempotent_through_its_own_output() {
        for raw in ["7", "0.25", "-3", "abc"] {
            let once = parse_count(Some(raw));
            let twice = parse_count(Some(&once.to_string()));
            assert_eq!(once, twice);
        }
    }
}
