/// Identity of a cached page: origin host plus request path.
///
/// No normalization is applied (case, trailing slash, port); two
/// spellings of the same URL are distinct keys.
#[derive(Hash, Eq, PartialEq, Debug, Clone)]
pub struct CacheKey {
    pub host: String,
    pub path: String,
}

impl CacheKey {
    pub fn new(host: &str, path: &str) -> Self {
        Self {
            host: host.to_string(),
            path: path.to_string(),
        }
    }
}
