// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The `date` helper and moment-style date formatting.

use crate::error::{PlumeError, Result};
use crate::registry::HelperCall;
use crate::render::RenderState;
use crate::value::Value;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fmt::Write;

const DEFAULT_FORMAT: &str = "MMM DD, YYYY";

/// Recognised tokens, longest first so `MMMM` is not read as `MM` twice.
const TOKENS: &[&str] = &[
    "YYYY", "MMMM", "dddd", "MMM", "ddd", "YY", "MM", "DD", "Do", "HH", "hh", "mm", "ss", "M", "D",
    "H", "h", "A", "a",
];

/// `{{date [value] format="..." timeago="true"}}`.
///
/// Without a value argument the current post's publication date is used,
/// falling back to the request time.
pub(crate) fn date<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let value = if call.params.is_empty() {
        match state.current_post().and_then(|post| post.published_at) {
            Some(published) => Value::Date(published),
            None => Value::Date(state.data().now),
        }
    } else {
        state.param(call, 0)?
    };

    let date = match value {
        Value::Absent => return Ok(Value::Absent),
        Value::Date(date) => date,
        Value::Str(ref text) => DateTime::parse_from_rfc3339(text)
            .map(|date| date.with_timezone(&Utc))
            .map_err(|e| PlumeError::helper(call.name, format!("invalid date '{}': {}", text, e)))?,
        other => {
            return Err(PlumeError::helper(
                call.name,
                format!("'{}' is not a date", other.to_text()),
            ))
        }
    };

    if state.hash_flag(call, "timeago")? {
        return Ok(Value::string(time_ago(date, state.data().now)));
    }
    let format = state
        .hash_string(call, "format")?
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
    Ok(Value::string(format_date(&date, &format)))
}

/// Formats `date` with moment-style tokens. Text in `[brackets]` is literal.
pub fn format_date(date: &DateTime<Utc>, format: &str) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        match TOKENS.iter().find(|token| rest.starts_with(*token)) {
            Some(token) => {
                write_token(&mut out, date, token);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

fn write_token(out: &mut String, date: &DateTime<Utc>, token: &str) {
    let (pm, hour12) = date.hour12();
    let _ = match token {
        "YYYY" => write!(out, "{}", date.year()),
        "YY" => write!(out, "{:02}", date.year() % 100),
        "MMMM" => write!(out, "{}", date.format("%B")),
        "MMM" => write!(out, "{}", date.format("%b")),
        "MM" => write!(out, "{:02}", date.month()),
        "M" => write!(out, "{}", date.month()),
        "DD" => write!(out, "{:02}", date.day()),
        "D" => write!(out, "{}", date.day()),
        "Do" => write!(out, "{}{}", date.day(), ordinal_suffix(date.day())),
        "dddd" => write!(out, "{}", date.format("%A")),
        "ddd" => write!(out, "{}", date.format("%a")),
        "HH" => write!(out, "{:02}", date.hour()),
        "H" => write!(out, "{}", date.hour()),
        "hh" => write!(out, "{:02}", hour12),
        "h" => write!(out, "{}", hour12),
        "mm" => write!(out, "{:02}", date.minute()),
        "ss" => write!(out, "{:02}", date.second()),
        "A" => write!(out, "{}", if pm { "PM" } else { "AM" }),
        "a" => write!(out, "{}", if pm { "pm" } else { "am" }),
        _ => write!(out, "{}", token),
    };
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Relative phrase for `date` as seen from `now`, e.g. `3 days ago`.
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    let phrase = relative_phrase(seconds.unsigned_abs());
    if seconds < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn relative_phrase(seconds: u64) -> String {
    let minutes = (seconds as f64 / 60.0).round() as u64;
    let hours = (seconds as f64 / 3600.0).round() as u64;
    let days = (seconds as f64 / 86400.0).round() as u64;

    match seconds {
        0..=44 => "a few seconds".to_string(),
        45..=89 => "a minute".to_string(),
        s if s < 45 * 60 => format!("{} minutes", minutes),
        s if s < 90 * 60 => "an hour".to_string(),
        s if s < 22 * 3600 => format!("{} hours", hours),
        s if s < 36 * 3600 => "a day".to_string(),
        _ if days < 26 => format!("{} days", days),
        _ if days < 45 => "a month".to_string(),
        _ if days < 320 => format!("{} months", (days as f64 / 30.0).round() as u64),
        _ if days < 548 => "a year".to_string(),
        _ => format!("{} years", (days as f64 / 365.0).round() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_default_format() {
        assert_eq!(format_date(&sample(), DEFAULT_FORMAT), "Mar 02, 2024");
    }

    #[test]
    fn test_all_tokens() {
        let date = sample();
        assert_eq!(format_date(&date, "YYYY-MM-DD HH:mm:ss"), "2024-03-02 15:04:05");
        assert_eq!(format_date(&date, "dddd, MMMM Do YY"), "Saturday, March 2nd 24");
        assert_eq!(format_date(&date, "ddd D/M h:mm a"), "Sat 2/3 3:04 pm");
        assert_eq!(format_date(&date, "hh A"), "03 PM");
    }

    #[test]
    fn test_bracketed_text_is_literal() {
        assert_eq!(format_date(&sample(), "[Posted] YYYY"), "Posted 2024");
    }

    #[test]
    fn test_ordinal_suffixes() {
        let suffixes: Vec<_> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 31]
            .iter()
            .map(|day| ordinal_suffix(*day))
            .collect();
        assert_eq!(
            suffixes,
            vec!["st", "nd", "rd", "th", "th", "th", "th", "st", "nd", "rd", "st"]
        );
    }

    #[test]
    fn test_time_ago() {
        let now = sample();
        assert_eq!(time_ago(now - Duration::seconds(10), now), "a few seconds ago");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(time_ago(now - Duration::days(400), now), "a year ago");
        assert_eq!(time_ago(now + Duration::days(2), now), "in 2 days");
    }
}
