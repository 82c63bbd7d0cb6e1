/// One cached page.
///
/// Entries are only ever built from a complete, successful fetch or
/// revalidation; there is no partially-constructed state. The header
/// fields hold the raw string values from the producing response, or
/// empty strings where the origin omitted them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// Origin identity; fixed for the lifetime of the key.
    pub host: String,
    pub path: String,
    /// Last known response payload.
    pub body: Vec<u8>,
    /// The `Date` header of the response that produced this entry —
    /// the server-reported response date, not a local clock reading.
    pub date: String,
    pub last_modified: String,
    pub expires: String,
}

impl CacheEntry {
    pub fn new(
        host: &str,
        path: &str,
        body: Vec<u8>,
        date: &str,
        last_modified: &str,
        expires: &str,
    ) -> Self {
        Self {
            host: host.to_string(),
            path: path.to_string(),
            body,
            date: date.to_string(),
            last_modified: last_modified.to_string(),
            expires: expires.to_string(),
        }
    }
}
