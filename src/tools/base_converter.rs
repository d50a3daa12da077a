//! Number base converter (bases 2 to 36)
//!
//! Inputs arrive as raw form text. Base fields are read the way a browser's
//! `parseInt` reads them: leading whitespace, optional sign, then the longest
//! run of digits; an empty, zero or unparsable base counts as missing.

use thiserror::Error;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

/// Reasons a conversion is refused; `Display` is the user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("Error: All fields are required.")]
    MissingField,

    #[error("Error: Bases must be between 2 and 36.")]
    BaseOutOfRange,

    #[error("Error: \"{number}\" is not a valid number for base {base}.")]
    InvalidDigits { number: String, base: u32 },

    /// Value too large to represent
    #[error("An unexpected error occurred during conversion.")]
    Overflow,
}

/// Leading integer of a form field, or `None` when there is none
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Every character is a digit of `base`, and there is at least one
pub fn is_valid_for_base(number: &str, base: u32) -> bool {
    !number.is_empty() && number.chars().all(|c| c.is_digit(base))
}

/// Render `value` in `base` with upper-case digits
pub fn to_radix(mut value: u128, base: u32) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let base = u128::from(base);
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % base) as u32;
        digits.push(char::from_digit(digit, base as u32).map_or('?', |c| c.to_ascii_uppercase()));
        value /= base;
    }
    digits.iter().rev().collect()
}

/// Convert `number` written in `from_base` into `to_base`
pub fn convert(number: &str, from_base: &str, to_base: &str) -> Result<String, ConvertError> {
    let number = number.trim();
    let from = parse_leading_int(from_base).filter(|b| *b != 0);
    let to = parse_leading_int(to_base).filter(|b| *b != 0);

    let (Some(from), Some(to)) = (from, to) else {
        return Err(ConvertError::MissingField);
    };
    if number.is_empty() {
        return Err(ConvertError::MissingField);
    }

    let range = i64::from(MIN_BASE)..=i64::from(MAX_BASE);
    if !range.contains(&from) || !range.contains(&to) {
        return Err(ConvertError::BaseOutOfRange);
    }
    let (from, to) = (from as u32, to as u32);

    if !is_valid_for_base(number, from) {
        return Err(ConvertError::InvalidDigits {
            number: number.to_owned(),
            base: from,
        });
    }

    let value = u128::from_str_radix(number, from).map_err(|_| ConvertError::Overflow)?;
    Ok(to_radix(value, to))
}

/// A successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input: String,
    pub from_base: u32,
    pub to_base: u32,
    pub output: String,
}

/// The converter form: keeps the last successful conversion, which a
/// rejected submission leaves untouched
#[derive(Debug, Default)]
pub struct BaseConverter {
    last: Option<Conversion>,
    error: Option<ConvertError>,
}

impl BaseConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, number: &str, from_base: &str, to_base: &str) -> Result<&Conversion, ConvertError> {
        match convert(number, from_base, to_base) {
            Ok(output) => {
                self.error = None;
                let from_base = parse_leading_int(from_base).unwrap_or_default() as u32;
                let to_base = parse_leading_int(to_base).unwrap_or_default() as u32;
                let conversion = self.last.insert(Conversion {
                    input: number.trim().to_owned(),
                    from_base,
                    to_base,
                    output,
                });
                log::debug!(
                    "{} (base {}) = {} (base {})",
                    conversion.input,
                    conversion.from_base,
                    conversion.output,
                    conversion.to_base
                );
                Ok(conversion)
            }
            Err(err) => {
                log::debug!("conversion rejected: {}", err);
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn last(&self) -> Option<&Conversion> {
        self.last.as_ref()
    }

    /// Text for the result area
    pub fn result_text(&self) -> String {
        match (&self.error, &self.last) {
            (Some(err), _) => err.to_string(),
            (None, Some(conversion)) => conversion.output.clone(),
            (None, None) => String::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_binary() {
        assert_eq!(convert("ff", "16", "2").unwrap(), "11111111");
        assert_eq!(convert("255", "10", "16").unwrap(), "FF");
        assert_eq!(convert(" z ", "36", "10").unwrap(), "35");
        assert_eq!(convert("0", "8", "2").unwrap(), "0");
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(convert("", "10", "2"), Err(ConvertError::MissingField));
        assert_eq!(convert("12", "", "2"), Err(ConvertError::MissingField));
        assert_eq!(convert("12", "0", "2"), Err(ConvertError::MissingField));
        assert_eq!(convert("12", "ten", "2"), Err(ConvertError::MissingField));
    }

    #[test]
    fn test_base_range() {
        assert_eq!(convert("1", "1", "10"), Err(ConvertError::BaseOutOfRange));
        assert_eq!(convert("1", "10", "37"), Err(ConvertError::BaseOutOfRange));
        assert_eq!(convert("1", "-2", "10"), Err(ConvertError::BaseOutOfRange));
    }

    #[test]
    fn test_invalid_digits_message() {
        let err = convert("129", "8", "10").unwrap_err();
        assert_eq!(err.to_string(), "Error: \"129\" is not a valid number for base 8.");
        assert!(convert("-5", "10", "2").is_err());
    }

    #[test]
    fn test_base_fields_parse_like_forms() {
        assert_eq!(parse_leading_int("16px"), Some(16));
        assert_eq!(parse_leading_int("  8"), Some(8));
        assert_eq!(parse_leading_int("0x10"), Some(16));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(convert("11", "2.5", "10").unwrap(), "3");
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = "z".repeat(40);
        assert_eq!(convert(&huge, "36", "10"), Err(ConvertError::Overflow));
    }

    #[test]
    fn test_rejected_submission_keeps_last_result() {
        let mut converter = BaseConverter::new();
        converter.submit("10", "10", "2").unwrap();
        assert_eq!(converter.result_text(), "1010");

        assert!(converter.submit("10", "99", "2").is_err());
        assert!(converter.is_error());
        assert_eq!(converter.result_text(), "Error: Bases must be between 2 and 36.");
        assert_eq!(converter.last().map(|c| c.output.as_str()), Some("1010"));

        converter.submit("7", "10", "8").unwrap();
        assert!(!converter.is_error());
        assert_eq!(converter.result_text(), "7");
    }
}
