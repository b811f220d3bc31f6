use crate::config::toml_config::Settings;
use crate::utils::error::{EtlError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Response, StatusCode};

/// Client carrying the browser-like headers the search service expects.
pub fn build_client(settings: &Settings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-gpc", HeaderValue::from_static("1"));

    let client = Client::builder()
        .user_agent(settings.http.user_agent.as_str())
        .default_headers(headers)
        .build()?;

    Ok(client)
}

/// Passes the response through on 200 and turns anything else into
/// `EtlError::UpstreamStatus` carrying the body.
pub async fn ensure_ok(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::error!("Request to {} failed with {}", url, status);

    Err(EtlError::UpstreamStatus {
        url,
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_default_headers_are_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ping")
                .header("user-agent", crate::config::toml_config::DEFAULT_USER_AGENT)
                .header("accept-language", "en-US,en;q=0.9")
                .header("sec-fetch-mode", "cors");
            then.status(200).body("pong");
        });

        let client = build_client(&Settings::default()).unwrap();
        let response = client.get(server.url("/ping")).send().await.unwrap();
        let response = ensure_ok(response).await.unwrap();

        mock.assert();
        assert_eq!(response.text().await.unwrap(), "pong");
    }

    #[tokio::test]
    async fn test_non_ok_status_carries_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blocked");
            then.status(403).body("captcha required");
        });

        let client = build_client(&Settings::default()).unwrap();
        let response = client.get(server.url("/blocked")).send().await.unwrap();
        let err = ensure_ok(response).await.unwrap_err();

        match err {
            EtlError::UpstreamStatus { status, body, url } => {
                assert_eq!(status, 403);
                assert_eq!(body, "captcha required");
                assert!(url.ends_with("/blocked"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
