use crate::error::ParseError;
use crate::models::RawStat;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Decimal numeral with an optional K/M scale suffix, commas already removed
    static ref STAT_PATTERN: Regex =
        Regex::new(r"^(-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))([KM]?)$").expect("stat pattern compiles");
}

/// Turns a displayed stat ("92.2M", "71,907,600", "384.0K", 900) into a
/// comparable magnitude. The raw display value is left untouched.
pub fn clean<'a>(value: impl Into<RawStat<'a>>) -> Result<f64, ParseError> {
    match value.into() {
        RawStat::Number(n) => Ok(n),
        RawStat::Text(text) => clean_text(text),
    }
}

fn clean_text(text: &str) -> Result<f64, ParseError> {
    let malformed = || ParseError {
        input: text.to_string(),
    };

    let stripped: String = text.trim().chars().filter(|c| *c != ',').collect();
    let captures = STAT_PATTERN.captures(&stripped).ok_or_else(malformed)?;

    let number: f64 = captures[1].parse().map_err(|_| malformed())?;
    let scale = match &captures[2] {
        "K" => 1e3,
        "M" => 1e6,
        _ => 1.0,
    };

    Ok(number * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_suffixes() {
        assert_eq!(clean("92.2M").unwrap(), 92_200_000.0);
        assert_eq!(clean("384.0K").unwrap(), 384_000.0);
        assert_eq!(clean("512.3K").unwrap(), 512_300.0);
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(clean("71,907,600").unwrap(), 71_907_600.0);
        assert_eq!(clean("113,987,059").unwrap(), 113_987_059.0);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(clean(900).unwrap(), 900.0);
        assert_eq!(clean(4u32).unwrap(), 4.0);
        assert_eq!(clean(2.5).unwrap(), 2.5);
    }

    #[test]
    fn test_plain_and_padded_strings() {
        assert_eq!(clean("42").unwrap(), 42.0);
        assert_eq!(clean(" 1.5K ").unwrap(), 1_500.0);
        assert_eq!(clean(".5M").unwrap(), 500_000.0);
    }

    #[test]
    fn test_malformed_values() {
        for input in ["", "M", "abc", "12.3B", "1.2.3", "K5", "--1"] {
            let err = clean(input).unwrap_err();
            assert_eq!(err.input, input);
        }
    }
}
