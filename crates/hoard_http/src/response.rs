//! Origin response scraping.
//!
//! Rather than parsing a full header block, the proxy only ever needs
//! three freshness-related headers and the body, so each is extracted
//! with its own narrow scan over the raw response bytes.

/// The freshness headers scraped out of an origin response.
///
/// A header the origin did not send is the empty string; absence is
/// not an error here, it just weakens the revalidation policy later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub date: String,
    pub last_modified: String,
    pub expires: String,
}

/// Scans `raw` for the `Date`, `Last-Modified` and `Expires` header
/// lines (each CRLF-terminated) and extracts their values. The three
/// searches are independent; the first match of each wins.
pub fn parse_headers(raw: &[u8]) -> ResponseHeaders {
    let text = String::from_utf8_lossy(raw);

    ResponseHeaders {
        date: scrape_header(&text, "date"),
        last_modified: scrape_header(&text, "last-modified"),
        expires: scrape_header(&text, "expires"),
    }
}

fn scrape_header(text: &str, wanted: &str) -> String {
    for line in text.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case(wanted) {
            return value.trim().to_string();
        }
    }
    String::new()
}

/// Returns everything after the first blank-line delimiter
/// (`\r\n\r\n`), or an empty result if the delimiter is absent.
///
/// An empty return is not distinguishable from a legitimately empty
/// body; callers treat it as "nothing to serve" either way.
pub fn parse_body(raw: &[u8]) -> Vec<u8> {
    match raw.windows(4).position(|w| w == b"\r\n\r\n") {
        Some(pos) => raw[pos + 4..].to_vec(),
        None => Vec::new(),
    }
}
