//! Content identifier extraction from detail-page URLs

use super::patterns::IDENTIFIER;
use url::Url;

/// Pull the trailing numeric identifier from a URL path.
///
/// `https://www.stage.in/en/haryanvi/movie/kayantar-14145` yields `14145`.
/// Query strings and fragments are ignored when the URL parses; otherwise the
/// raw string is matched up to its first `?` or `#`.
pub fn extract_identifier(url: &str) -> Option<String> {
    let path = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
    };

    IDENTIFIER
        .captures(&path)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_from_slug() {
        assert_eq!(
            extract_identifier("https://www.stage.in/en/haryanvi/movie/kayantar-14145"),
            Some("14145".to_string())
        );
        assert_eq!(
            extract_identifier("https://www.stage.in/en/rajasthani/show/videshi-bahu-5521?ref=home#top"),
            Some("5521".to_string())
        );
    }

    #[test]
    fn test_identifier_without_hyphen() {
        assert_eq!(extract_identifier("https://www.stage.in/movie/14145"), Some("14145".to_string()));
    }

    #[test]
    fn test_identifier_absent() {
        assert_eq!(extract_identifier("https://www.stage.in/en/haryanvi/movie/kayantar"), None);
        assert_eq!(extract_identifier(""), None);
    }

    #[test]
    fn test_identifier_from_unparseable_url() {
        assert_eq!(extract_identifier("stage.in/movie/kayantar-14145?x=1"), Some("14145".to_string()));
    }
}
