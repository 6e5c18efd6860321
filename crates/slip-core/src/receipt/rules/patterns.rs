//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Price with exactly two decimals, optional dollar sign: 8.99, $42.00
    pub static ref PRICE: Regex = Regex::new(
        r"\$?\d+\.\d{2}"
    ).unwrap();

    // Date patterns, in priority order. The token is capture group 1 and may
    // touch letters ("2024-01-15T10:00") but not further digits.
    pub static ref DATE_SLASH_MDY: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2}/\d{1,2}/\d{2,4})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_DASH_MDY: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2}-\d{1,2}-\d{2,4})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_ISO: Regex = Regex::new(
        r"(?:^|\D)(\d{4}-\d{1,2}-\d{1,2})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_DOT_MDY: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2}\.\d{1,2}\.\d{2,4})(?:\D|$)"
    ).unwrap();

    // Leading quantity on a whitespace-collapsed name: "3 x Fries", "2 X Soda"
    pub static ref QUANTITY_PREFIX: Regex = Regex::new(
        r"^(\d+) [xX] "
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}

/// Date patterns in the order they are tried on each line.
pub fn date_patterns() -> [&'static Regex; 4] {
    [&*DATE_SLASH_MDY, &*DATE_DASH_MDY, &*DATE_ISO, &*DATE_DOT_MDY]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_pattern() {
        assert_eq!(PRICE.find("Burger 8.99").unwrap().as_str(), "8.99");
        assert_eq!(PRICE.find("Total $42.00").unwrap().as_str(), "$42.00");
        assert!(PRICE.find("Qty 3").is_none());
        assert!(PRICE.find("1.5").is_none());
    }

    fn date_token<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
        re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
    }

    #[test]
    fn test_dash_date_does_not_match_inside_iso() {
        assert_eq!(date_token(&DATE_DASH_MDY, "2024-01-15"), None);
        assert_eq!(date_token(&DATE_ISO, "2024-01-15"), Some("2024-01-15"));
    }

    #[test]
    fn test_date_token_may_touch_letters() {
        assert_eq!(date_token(&DATE_ISO, "2024-01-15T10:00"), Some("2024-01-15"));
        assert_eq!(date_token(&DATE_SLASH_MDY, "DATE01/15/2024"), Some("01/15/2024"));
        assert_eq!(date_token(&DATE_SLASH_MDY, "01/15/2024TIME"), Some("01/15/2024"));
        assert_eq!(date_token(&DATE_SLASH_MDY, "101/15/20245"), None);
    }

    #[test]
    fn test_quantity_prefix() {
        let caps = QUANTITY_PREFIX.captures("3 x Fries").unwrap();
        assert_eq!(&caps[1], "3");
        assert!(QUANTITY_PREFIX.is_match("2 X Soda"));
        assert!(!QUANTITY_PREFIX.is_match("2X Soda"));
        assert!(!QUANTITY_PREFIX.is_match("2x Soda"));
        assert!(!QUANTITY_PREFIX.is_match("Fries x 3"));
        assert!(!QUANTITY_PREFIX.is_match("3 xl shirt"));
    }
}
