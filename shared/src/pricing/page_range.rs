//! Custom page range parsing
//!
//! A range spec is a comma-separated list of page numbers and inclusive
//! `start-end` ranges, e.g. `"1-3, 7, 10-12"`. Tokens are summed as written
//! (overlaps are charged twice, as they are printed twice).

use crate::error::ErrorCode;

use super::error::{PricingError, PricingResult};

/// Longest accepted range spec
pub const MAX_RANGE_SPEC_LEN: usize = 512;

enum Token {
    Page(u32),
    Range(u32, u32),
    Invalid,
}

fn parse_token(token: &str) -> Token {
    let token = token.trim();
    match token.split_once('-') {
        Some((start, end)) => match (start.trim().parse::<u32>(), end.trim().parse::<u32>()) {
            (Ok(start), Ok(end)) => Token::Range(start, end),
            _ => Token::Invalid,
        },
        None => match token.parse::<u32>() {
            Ok(page) => Token::Page(page),
            Err(_) => Token::Invalid,
        },
    }
}

fn tokens(spec: &str) -> impl Iterator<Item = Token> + '_ {
    spec.split(',')
        .filter(|t| !t.trim().is_empty())
        .map(parse_token)
}

/// Pages a token selects; zero, inverted and non-numeric tokens select none
///
/// Pages past `last_page` are not printed, so ranges are clamped to it.
fn token_pages(token: Token, last_page: u32) -> u64 {
    match token {
        Token::Page(0) | Token::Invalid => 0,
        Token::Page(page) => u64::from(page <= last_page),
        Token::Range(start, end) if start == 0 || start > end || start > last_page => 0,
        Token::Range(start, end) => u64::from(end.min(last_page) - start) + 1,
    }
}

/// Lenient page count, ignoring pages past the end of the document
pub fn count_pages_in_range(spec: &str, document_pages: u32) -> u32 {
    let total: u64 = tokens(spec)
        .map(|t| token_pages(t, document_pages))
        .sum();
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Strict syntax check for a customer-supplied range spec
pub fn validate_page_range(spec: &str) -> PricingResult<()> {
    let invalid = |message: String| PricingError::validation(ErrorCode::InvalidPageRange, message);

    if spec.trim().is_empty() {
        return Err(invalid("page range is empty".to_string()));
    }
    if spec.len() > MAX_RANGE_SPEC_LEN {
        return Err(invalid(format!(
            "page range is longer than {MAX_RANGE_SPEC_LEN} characters"
        )));
    }
    for raw in spec.split(',') {
        if raw.trim().is_empty() {
            return Err(invalid(format!("page range '{spec}' has an empty entry")));
        }
        if matches!(parse_token(raw), Token::Invalid) {
            return Err(invalid(format!(
                "page range entry '{}' is not a page number or start-end range",
                raw.trim()
            )));
        }
    }
    Ok(())
}
