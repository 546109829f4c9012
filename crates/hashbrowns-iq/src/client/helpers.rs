//! Pure helpers: endpoint URL construction (no HTTP, no status logic).

use url::Url;

use crate::error::{IqError, IqResult};

const API_PREFIX: [&str; 2] = ["api", "v2"];

/// Parse and normalize the configured server base URL.
pub(crate) fn parse_base_url(raw: &str) -> IqResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IqError::Config {
            message: "server url is empty".to_string(),
        });
    }

    let url = Url::parse(trimmed).map_err(|e| IqError::Config {
        message: format!("invalid server url {trimmed:?}: {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(IqError::Config {
            message: format!("server url {trimmed:?} cannot be used as a base"),
        });
    }
    Ok(url)
}

/// `{base}/api/v2/{segments...}` with each segment percent-encoded.
fn api_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(API_PREFIX).extend(segments);
    }
    url
}

/// `{base}/api/v2/applications?publicId={public_id}`
pub(crate) fn applications_url(base: &Url, public_id: &str) -> Url {
    let mut url = api_url(base, &["applications"]);
    url.query_pairs_mut().append_pair("publicId", public_id);
    url
}

/// `{base}/api/v2/scan/applications/{internal_id}/sources/{source}?stageId={stage}`
pub(crate) fn submission_url(base: &Url, internal_id: &str, source: &str, stage: &str) -> Url {
    let mut url = api_url(base, &["scan", "applications", internal_id, "sources", source]);
    url.query_pairs_mut().append_pair("stageId", stage);
    url
}

/// `{base}/{status_url}`; absolute status URLs are used unchanged.
pub(crate) fn status_url(base: &Url, status_url: &str) -> String {
    if status_url.starts_with("http://") || status_url.starts_with("https://") {
        return status_url.to_string();
    }
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        status_url.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(raw: &str) -> Url {
        parse_base_url(raw).unwrap()
    }

    #[test]
    fn test_applications_url_encodes_public_id() {
        let url = applications_url(&base("http://localhost:8070"), "my app&co");
        assert_eq!(
            url.as_str(),
            "http://localhost:8070/api/v2/applications?publicId=my+app%26co"
        );
    }

    #[test]
    fn test_submission_url() {
        let url = submission_url(&base("http://localhost:8070/"), "4bb6", "hashbrowns", "build");
        assert_eq!(
            url.as_str(),
            "http://localhost:8070/api/v2/scan/applications/4bb6/sources/hashbrowns?stageId=build"
        );
    }

    #[test]
    fn test_urls_keep_base_path_prefix() {
        let url = applications_url(&base("https://example.com/iq/"), "app");
        assert_eq!(
            url.as_str(),
            "https://example.com/iq/api/v2/applications?publicId=app"
        );
    }

    #[test]
    fn test_status_url_joins_relative_handle() {
        let joined = status_url(
            &base("http://localhost:8070"),
            "api/v2/scan/applications/4bb6/status/9cee",
        );
        assert_eq!(
            joined,
            "http://localhost:8070/api/v2/scan/applications/4bb6/status/9cee"
        );

        let joined = status_url(&base("http://localhost:8070/iq/"), "/api/v2/x");
        assert_eq!(joined, "http://localhost:8070/iq/api/v2/x");
    }

    #[test]
    fn test_status_url_passes_absolute_through() {
        let joined = status_url(&base("http://localhost:8070"), "https://other/status/1");
        assert_eq!(joined, "https://other/status/1");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(matches!(parse_base_url(""), Err(IqError::Config { .. })));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(IqError::Config { .. })
        ));
        assert!(matches!(
            parse_base_url("mailto:x@example.com"),
            Err(IqError::Config { .. })
        ));
    }
}
