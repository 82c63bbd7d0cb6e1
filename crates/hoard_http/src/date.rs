//! HTTP date parsing and freshness classification.

use std::time::SystemTime;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unparseable HTTP date '{0}'")]
    Unparseable(String),
}

/// Outcome of classifying a header timestamp against the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateClassification {
    /// Parses and lies strictly after the current time.
    Future,
    /// Parses and lies at or before the current time.
    PastOrPresent,
    /// Does not match the expected format at all.
    Unparseable,
}

/// Parses an RFC 1123 style timestamp, always as UTC.
///
/// Origins emit `Sun, 06 Nov 1994 08:49:37 GMT`; the zone token is
/// also allowed to be absent, in which case UTC is assumed rather
/// than the local timezone.
pub fn parse(text: &str) -> Result<SystemTime, DateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DateError::Unparseable(text.to_string()));
    }

    let mut candidate = trimmed.to_string();
    if !candidate.ends_with("GMT") {
        candidate.push_str(" GMT");
    }

    httpdate::parse_http_date(&candidate).map_err(|_| DateError::Unparseable(text.to_string()))
}

/// Classifies `text` against the current wall-clock time.
pub fn classify(text: &str) -> DateClassification {
    classify_at(text, SystemTime::now())
}

/// Classifies `text` against an explicit `now` (injectable for tests).
pub fn classify_at(text: &str, now: SystemTime) -> DateClassification {
    match parse(text) {
        Err(DateError::Unparseable(_)) => DateClassification::Unparseable,
        Ok(instant) if instant > now => DateClassification::Future,
        Ok(_) => DateClassification::PastOrPresent,
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::{classify, classify_at, parse, DateClassification};

    #[test]
    fn parse_accepts_zoneless_dates_as_utc() {
        let bare = parse("Wed, 21 Oct 2015 07:28:00").expect("expected parse");
        let zoned = parse("Wed, 21 Oct 2015 07:28:00 GMT").expect("expected parse");
        assert_eq!(bare, zoned);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse("not a date").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn classify_future_date() {
        assert_eq!(
            classify("Wed, 21 Oct 2099 07:28:00"),
            DateClassification::Future
        );
    }

    #[test]
    fn classify_past_date() {
        assert_eq!(
            classify("Wed, 21 Oct 2015 07:28:00"),
            DateClassification::PastOrPresent
        );
    }

    #[test]
    fn classify_garbage() {
        assert_eq!(classify("not a date"), DateClassification::Unparseable);
    }

    #[test]
    fn classify_at_exact_instant_is_past_or_present() {
        let stamp = "Wed, 21 Oct 2015 07:28:00 GMT";
        let instant = parse(stamp).expect("expected parse");
        assert_eq!(
            classify_at(stamp, instant),
            DateClassification::PastOrPresent
        );
    }

    #[test]
    fn classify_at_with_fixed_clock() {
        let now: SystemTime = parse("Wed, 21 Oct 2015 07:28:00 GMT").expect("expected parse");
        assert_eq!(
            classify_at("Wed, 21 Oct 2015 07:28:01", now),
            DateClassification::Future
        );
        assert_eq!(
            classify_at("Wed, 21 Oct 2015 07:27:59", now),
            DateClassification::PastOrPresent
        );
    }
}
