// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp and date conversions shared across layers.
//!
//! Timestamps are stored as RFC 3339 strings in UTC; dates (merge end
//! dates, task due dates) are stored as `YYYY-MM-DD`. Comparisons on
//! timestamps are always done on parsed values, never on raw strings.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::DomainError;

/// Storage format for date-only values.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an RFC 3339 timestamp.
///
/// # Arguments
///
/// * `value` - The timestamp string
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid
/// RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| DomainError::DateParseError {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Renders a timestamp as an RFC 3339 string.
///
/// # Arguments
///
/// * `value` - The timestamp to render
///
/// # Errors
///
/// Returns `DomainError::DateRenderError` if the timestamp cannot be
/// represented in RFC 3339 (e.g., year out of range).
pub fn render_timestamp(value: OffsetDateTime) -> Result<String, DomainError> {
    value
        .format(&Rfc3339)
        .map_err(|e| DomainError::DateRenderError {
            error: e.to_string(),
        })
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Arguments
///
/// * `value` - The date string
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid
/// calendar date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Renders a date as `YYYY-MM-DD`.
///
/// # Arguments
///
/// * `value` - The date to render
///
/// # Errors
///
/// Returns `DomainError::DateRenderError` if the date cannot be rendered.
pub fn render_date(value: Date) -> Result<String, DomainError> {
    value
        .format(DATE_FORMAT)
        .map_err(|e| DomainError::DateRenderError {
            error: e.to_string(),
        })
}
