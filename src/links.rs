//! Content URL validation and discovery in free text

use crate::extraction::patterns::URL_IN_TEXT;
use url::Url;

/// Whether `url` looks like a content detail page on `site_domain`.
///
/// The host must be the domain or one of its subdomains, and the path must carry
/// a movie/show/series segment or a hyphenated slug.
pub fn is_site_url(url: &str, site_domain: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let domain = site_domain.trim().trim_start_matches('.').to_lowercase();
    let on_site = parsed.host_str().is_some_and(|host| {
        let host = host.to_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    });
    if !on_site {
        return false;
    }

    let path = parsed.path().to_lowercase();
    ["movie", "show", "series"]
        .iter()
        .any(|segment| path.contains(segment))
        || path.contains('-')
}

/// All absolute http(s) URLs mentioned in `text`, in order
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_IN_TEXT
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
