//! Revalidation-timestamp selection.
//!
//! Given a cache hit, pick which header value is presented as the
//! `If-Modified-Since` timestamp, or decide no conditional request is
//! possible at all.

use std::time::SystemTime;

use hoard_http::date::{classify_at, DateClassification};

use crate::entry::CacheEntry;

/// Selects the timestamp for the conditional request, in priority
/// order:
///
/// 1. `expires`, but only while it still lies in the future — a
///    carried-over quirk of the design: it does not skip
///    revalidation, it only picks which value is presented;
/// 2. `last_modified`, whenever it parses at all;
/// 3. `date`, whenever it parses at all.
///
/// `None` means no field is usable: the caller serves the cached
/// entry as-is, flagged potentially stale (a warning, not an error).
pub fn revalidation_timestamp(entry: &CacheEntry) -> Option<String> {
    revalidation_timestamp_at(entry, SystemTime::now())
}

/// Same selection against an explicit `now` (injectable for tests).
pub fn revalidation_timestamp_at(entry: &CacheEntry, now: SystemTime) -> Option<String> {
    if classify_at(&entry.expires, now) == DateClassification::Future {
        return Some(entry.expires.clone());
    }
    if classify_at(&entry.last_modified, now) != DateClassification::Unparseable {
        return Some(entry.last_modified.clone());
    }
    if classify_at(&entry.date, now) != DateClassification::Unparseable {
        return Some(entry.date.clone());
    }
    None
}

#[cfg(test)]
mod tests {
    use hoard_http::date::parse;

    use super::revalidation_timestamp_at;
    use crate::entry::CacheEntry;

    const NOW: &str = "Wed, 21 Oct 2020 12:00:00 GMT";
    const PAST: &str = "Wed, 21 Oct 2015 07:28:00 GMT";
    const FUTURE: &str = "Wed, 21 Oct 2099 07:28:00 GMT";

    fn entry(date: &str, last_modified: &str, expires: &str) -> CacheEntry {
        CacheEntry::new(
            "example.test",
            "/index.html",
            b"body".to_vec(),
            date,
            last_modified,
            expires,
        )
    }

    fn select(entry: &CacheEntry) -> Option<String> {
        revalidation_timestamp_at(entry, parse(NOW).expect("fixed clock"))
    }

    #[test]
    fn future_expires_wins_over_everything() {
        let entry = entry(PAST, PAST, FUTURE);
        assert_eq!(select(&entry), Some(FUTURE.to_string()));
    }

    #[test]
    fn elapsed_expires_is_skipped() {
        let entry = entry("", PAST, PAST);
        assert_eq!(select(&entry), Some(PAST.to_string()));
    }

    #[test]
    fn absent_expires_falls_back_to_last_modified() {
        let entry = entry("", FUTURE, "");
        // Any parseable last_modified is selected, future or past.
        assert_eq!(select(&entry), Some(FUTURE.to_string()));
    }

    #[test]
    fn unparseable_fields_fall_through_to_date() {
        let entry = entry(PAST, "not a date", "also not a date");
        assert_eq!(select(&entry), Some(PAST.to_string()));
    }

    #[test]
    fn no_usable_field_selects_nothing() {
        let entry = entry("", "garbage", "");
        assert_eq!(select(&entry), None);
    }
}
