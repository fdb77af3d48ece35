use crate::error::{Result, UpstreamError};
use std::time::Duration;

/// 呼び出しごとのタイムアウト付きクライアント
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Validates `base_url` and strips any trailing slash.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(base_url).map_err(|e| UpstreamError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UpstreamError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_base_url("https://cars.example.com/api").unwrap(),
            "https://cars.example.com/api"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(UpstreamError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            normalize_base_url("ftp://cars.example.com"),
            Err(UpstreamError::InvalidBaseUrl { .. })
        ));
    }
}
