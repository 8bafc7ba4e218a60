//! Regex parsers for the semi-structured fields embedded in issue titles
//! and bodies. Each field gets its own named parser returning a typed
//! result, so a format change only touches one place.

use regex::{NoExpand, Regex};

use crate::error::{BountyError, Result};

/// Extract the time spent from the issue body.
///
/// Matches `TOTAL TIME SPENT ON THIS ISSUE BY ASSIGNEE = H:MM`
/// case-insensitively and returns hours as a decimal, rounded to two
/// places.
pub fn extract_time(body: &str) -> Result<f64> {
    let re = Regex::new(r"(?i)TOTAL TIME SPENT ON THIS ISSUE BY ASSIGNEE\s*=\s*(\d{1,2}):(\d{2})")
        .unwrap();

    let caps = re.captures(body).ok_or(BountyError::TimeNotFound)?;
    let hours: u32 = caps[1].parse().map_err(|_| BountyError::TimeNotFound)?;
    let minutes: u32 = caps[2].parse().map_err(|_| BountyError::TimeNotFound)?;

    Ok(round2(hours as f64 + minutes as f64 / 60.0))
}

/// Extract the bracketed dollar price from an issue title.
///
/// Titles follow the `[TYPE][$price] rest-of-title` contract; the price
/// token may appear anywhere in the title.
pub fn extract_title_price(title: &str) -> Result<f64> {
    let re = Regex::new(r"\[.*?\]\[\$(\d+\.?\d*)\]").unwrap();

    let caps = re.captures(title).ok_or(BountyError::TitlePriceNotFound)?;
    caps[1].parse().map_err(|_| BountyError::TitlePriceNotFound)
}

/// Extract the pre-agreed bonus price from the issue body.
///
/// The bonus prompt ends in `USD:` (possibly bolded with asterisks)
/// followed by a dollar amount.
pub fn extract_expected_price(body: &str) -> Result<f64> {
    let re = Regex::new(r"(?i)USD:\**\s*\$?(\d+\.?\d*)").unwrap();

    let caps = re.captures(body).ok_or(BountyError::BonusPriceNotFound)?;
    caps[1].parse().map_err(|_| BountyError::BonusPriceNotFound)
}

/// Rewrite every `[$amount]` token of a title to the given price,
/// rounded to the nearest whole dollar. Titles without a price token
/// pass through unchanged.
pub fn rewrite_title_price(title: &str, new_price: f64) -> String {
    let re = Regex::new(r"\[\$\d+\.?\d*\]").unwrap();

    // NoExpand: the replacement itself contains a dollar sign
    re.replace_all(title, NoExpand(&format!("[${}]", new_price.round() as i64)))
        .into_owned()
}

/// Parse an hours-taken value that may be either `H:MM` or a bare
/// decimal number. Minutes above 59 are rejected so malformed board
/// data surfaces as a missing field rather than a wrong value.
pub fn parse_hours(text: &str) -> Option<f64> {
    let text = text.trim();

    if let Some((h, m)) = text.split_once(':') {
        let hours: u32 = h.parse().ok()?;
        let minutes: u32 = m.parse().ok()?;
        if minutes > 59 {
            return None;
        }
        return Some(round2(hours as f64 + minutes as f64 / 60.0));
    }

    text.parse().ok()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_time_basic() {
        let body = "Some notes\nTotal Time Spent On This Issue By Assignee = 3:30\nmore";
        assert_eq!(extract_time(body).unwrap(), 3.5);
    }

    #[test]
    fn test_extract_time_rounds_to_two_places() {
        let body = "TOTAL TIME SPENT ON THIS ISSUE BY ASSIGNEE = 1:20";
        assert_eq!(extract_time(body).unwrap(), 1.33);
    }

    #[test]
    fn test_extract_time_missing() {
        assert!(matches!(
            extract_time("no time here"),
            Err(BountyError::TimeNotFound)
        ));
    }

    #[test]
    fn test_extract_time_malformed_minutes() {
        // Single-digit minutes don't match the H:MM contract
        assert!(extract_time("TOTAL TIME SPENT ON THIS ISSUE BY ASSIGNEE = 3:5").is_err());
    }

    #[test]
    fn test_extract_title_price() {
        assert_eq!(extract_title_price("[Bug][$42] Fix thing").unwrap(), 42.0);
        assert_eq!(
            extract_title_price("[Feature][$99.50] Add thing").unwrap(),
            99.5
        );
    }

    #[test]
    fn test_extract_title_price_missing() {
        assert!(matches!(
            extract_title_price("[Bug] Fix thing"),
            Err(BountyError::TitlePriceNotFound)
        ));
    }

    #[test]
    fn test_extract_expected_price() {
        let body = "How much will be paid for Successful Resolution? USD: $50";
        assert_eq!(extract_expected_price(body).unwrap(), 50.0);
    }

    #[test]
    fn test_extract_expected_price_bold_prompt() {
        assert_eq!(extract_expected_price("**USD:** $75.25").unwrap(), 75.25);
        assert_eq!(extract_expected_price("usd: 30").unwrap(), 30.0);
    }

    #[test]
    fn test_extract_expected_price_missing() {
        assert!(matches!(
            extract_expected_price("nothing to see"),
            Err(BountyError::BonusPriceNotFound)
        ));
    }

    #[test]
    fn test_rewrite_title_price() {
        assert_eq!(
            rewrite_title_price("[Bug][$100] Fix thing", 150.0),
            "[Bug][$150] Fix thing"
        );
        assert_eq!(
            rewrite_title_price("[Bug][$99.50] Fix thing", 120.4),
            "[Bug][$120] Fix thing"
        );
    }

    #[test]
    fn test_rewrite_title_price_no_token() {
        assert_eq!(rewrite_title_price("no price", 10.0), "no price");
    }

    #[test]
    fn test_rewrite_title_price_every_token() {
        assert_eq!(
            rewrite_title_price("[Bug][$10] dup [$20] tokens", 30.0),
            "[Bug][$30] dup [$30] tokens"
        );
    }

    #[test]
    fn test_rewrite_then_extract_round_trip() {
        let title = rewrite_title_price("[Task][$7] Do work", 123.6);
        assert_eq!(extract_title_price(&title).unwrap(), 124.0);
    }

    #[test]
    fn test_parse_hours_colon_format() {
        assert_eq!(parse_hours("2:30"), Some(2.5));
        assert_eq!(parse_hours(" 0:45 "), Some(0.75));
    }

    #[test]
    fn test_parse_hours_bare_number() {
        assert_eq!(parse_hours("3"), Some(3.0));
        assert_eq!(parse_hours("1.25"), Some(1.25));
    }

    #[test]
    fn test_parse_hours_invalid() {
        assert_eq!(parse_hours("abc"), None);
        assert_eq!(parse_hours("1:xx"), None);
    }

    #[test]
    fn test_parse_hours_rejects_overflowing_minutes() {
        assert_eq!(parse_hours("1:99"), None);
        assert_eq!(parse_hours("0:60"), None);
        assert_eq!(parse_hours("0:59"), Some(0.98));
    }
}
