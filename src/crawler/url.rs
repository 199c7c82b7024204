//! URL resolution for article links and lead images
//!
//! Listing pages and article bodies reference links and images as absolute
//! URLs, root-relative or page-relative paths, protocol-relative URLs, or
//! responsive `srcset` lists. Everything that leaves this module is an
//! absolute URL string.

use url::Url;

/// Resolves candidate URLs against the site base
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base: String,
}

impl UrlResolver {
    /// Create a resolver for the given site base
    ///
    /// # Examples
    ///
    /// ```
    /// use newsharvest::crawler::url::UrlResolver;
    ///
    /// let resolver = UrlResolver::new("https://dantri.com.vn/");
    /// assert_eq!(
    ///     resolver.resolve("/cong-nghe/bai-viet.htm"),
    ///     "https://dantri.com.vn/cong-nghe/bai-viet.htm"
    /// );
    /// ```
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// The base every candidate is resolved against
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve `candidate` against the base; see [`resolve`]
    pub fn resolve(&self, candidate: &str) -> String {
        resolve(&self.base, candidate)
    }
}

/// Whether `candidate` already carries an `http` or `https` scheme
pub fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve a possibly relative URL against `base`
///
/// Candidates that already use `http`/`https` are returned unchanged.
/// Everything else goes through standard relative-reference resolution.
/// This never fails: if `base` cannot be parsed the two parts are
/// concatenated with a single `/` between them.
///
/// # Examples
///
/// ```
/// use newsharvest::crawler::url::resolve;
///
/// let base = "https://dantri.com.vn/";
/// assert_eq!(resolve(base, "https://cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
/// assert_eq!(resolve(base, "//cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
/// assert_eq!(resolve(base, "images/a.jpg"), "https://dantri.com.vn/images/a.jpg");
/// ```
pub fn resolve(base: &str, candidate: &str) -> String {
    let candidate = candidate.trim();
    if has_http_scheme(candidate) {
        return candidate.to_string();
    }

    match Url::parse(base).and_then(|b| b.join(candidate)) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            tracing::debug!(base, candidate, error = %e, "Falling back to string join");
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                candidate.trim_start_matches('/')
            )
        }
    }
}

/// Pick the highest-resolution candidate of a responsive image set
///
/// A `srcset` value lists `url descriptor` pairs separated by commas in
/// ascending quality, so the last entry is taken. Blank entries (a trailing
/// comma) are skipped. Returns an empty string when nothing usable remains.
///
/// # Examples
///
/// ```
/// use newsharvest::crawler::url::pick_from_srcset;
///
/// assert_eq!(pick_from_srcset("a.jpg 1x, b.jpg 2x"), "b.jpg");
/// assert_eq!(pick_from_srcset(""), "");
/// ```
pub fn pick_from_srcset(srcset: &str) -> String {
    srcset
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .last()
        .and_then(|entry| entry.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://dantri.com.vn/";

    #[test]
    fn test_absolute_unchanged() {
        let url = "https://icdn.dantri.com.vn/2024/01/01/photo.jpg";
        assert_eq!(resolve(BASE, url), url);
        assert_eq!(resolve(BASE, "HTTP://Example.com/x"), "HTTP://Example.com/x");
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            resolve(BASE, "/cong-nghe/abc.htm"),
            "https://dantri.com.vn/cong-nghe/abc.htm"
        );
    }

    #[test]
    fn test_page_relative_against_nested_base() {
        assert_eq!(
            resolve("https://dantri.com.vn/cong-nghe/", "trang-2.htm"),
            "https://dantri.com.vn/cong-nghe/trang-2.htm"
        );
    }

    #[test]
    fn test_protocol_relative_takes_base_scheme() {
        assert_eq!(
            resolve(BASE, "//cdnphoto.dantri.com.vn/a.webp"),
            "https://cdnphoto.dantri.com.vn/a.webp"
        );
    }

    #[test]
    fn test_unparseable_base_falls_back() {
        assert_eq!(resolve("not a base/", "/img/a.jpg"), "not a base/img/a.jpg");
    }

    #[test]
    fn test_resolver_struct_delegates() {
        let resolver = UrlResolver::new(BASE);
        assert_eq!(resolver.base(), BASE);
        assert_eq!(resolver.resolve("x.jpg"), "https://dantri.com.vn/x.jpg");
    }

    #[test]
    fn test_srcset_last_entry() {
        let srcset = "https://cdn/a_320.jpg 320w, https://cdn/a_640.jpg 640w, https://cdn/a_1280.jpg 1280w";
        assert_eq!(pick_from_srcset(srcset), "https://cdn/a_1280.jpg");
    }

    #[test]
    fn test_srcset_single_entry_without_descriptor() {
        assert_eq!(pick_from_srcset("/img/only.jpg"), "/img/only.jpg");
    }

    #[test]
    fn test_srcset_trailing_comma() {
        assert_eq!(pick_from_srcset("a.jpg 1x, b.jpg 2x,"), "b.jpg");
    }

    #[test]
    fn test_srcset_empty_and_blank() {
        assert_eq!(pick_from_srcset(""), "");
        assert_eq!(pick_from_srcset("  ,  , "), "");
    }
}
