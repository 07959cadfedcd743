//! Trailer line parsing
//!
//! The line after the sentinel is split on single spaces and token 3 is read
//! as an `MM/DD/YY` date, e.g. `01/16/23` in
//! `OR+ SUPPLIES DOWNLOADED 01/16/23 AT 1011 ARRAY BATCH# 4607`.

use chrono::NaiveDate;
use std::path::Path;

use crate::constants::{
    TRAILER_DATE_FORMAT, TRAILER_DATE_TOKEN_INDEX, TRAILER_TOKEN_SEPARATOR,
    TRANSMISSION_DATE_FORMAT,
};
use crate::{Error, Result};

/// Extract the transaction date from a trailer line as `YYYYMMDD`
pub fn parse_trailer_date(path: &Path, line: &str) -> Result<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let tokens: Vec<&str> = line.split(TRAILER_TOKEN_SEPARATOR).collect();

    let token = tokens.get(TRAILER_DATE_TOKEN_INDEX).ok_or_else(|| {
        Error::malformed_trailer(
            path,
            format!(
                "expected at least {} space-separated tokens, found {} in '{}'",
                TRAILER_DATE_TOKEN_INDEX + 1,
                tokens.len(),
                line
            ),
        )
    })?;

    let date = NaiveDate::parse_from_str(token.trim(), TRAILER_DATE_FORMAT).map_err(|e| {
        Error::malformed_trailer(path, format!("invalid trailer date '{}': {}", token, e))
    })?;

    Ok(date.format(TRANSMISSION_DATE_FORMAT).to_string())
}
