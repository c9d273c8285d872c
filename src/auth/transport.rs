//! HTTP client context for the login flow
//!
//! The session never talks to reqwest directly; it goes through
//! [`LoginTransport`] so tests can substitute a scripted provider.

use crate::auth::error::LoginResult;
use crate::auth::types::{GenerateResponse, LoginToken, PollResponse, PollResult, SessionCookies};
use crate::constants::{
    COOKIE_SCOPE_URLS, DEFAULT_REFERER, DEFAULT_USER_AGENT, QRCODE_GENERATE_URL, QRCODE_POLL_URL,
    REQUEST_TIMEOUT_SECS,
};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;

/// Provider calls made by a login session
#[async_trait]
pub trait LoginTransport: Send + Sync {
    /// Request a new scan URL and key
    async fn issue_token(&self) -> LoginResult<LoginToken>;

    /// Report the approval status of a pending token
    async fn poll(&self, token: &LoginToken) -> LoginResult<PollResult>;

    /// Cookies accumulated so far
    fn cookies(&self) -> SessionCookies;
}

/// Transport backed by a reqwest client with a shared cookie jar
pub struct HttpTransport {
    http_client: Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Create a new transport with the default headers and an empty jar
    pub fn new() -> LoginResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

        let jar = Arc::new(Jar::default());
        let http_client = Client::builder()
            .default_headers(headers)
            .cookie_provider(jar.clone())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { http_client, jar })
    }
}

#[async_trait]
impl LoginTransport for HttpTransport {
    async fn issue_token(&self) -> LoginResult<LoginToken> {
        crate::cprintln!(debug: "Sending request to: {}", QRCODE_GENERATE_URL);
        let body = self
            .http_client
            .get(QRCODE_GENERATE_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: GenerateResponse = serde_json::from_str(&body)?;
        response.into_token()
    }

    async fn poll(&self, token: &LoginToken) -> LoginResult<PollResult> {
        let body = self
            .http_client
            .get(QRCODE_POLL_URL)
            .query(&[("qrcode_key", token.key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: PollResponse = serde_json::from_str(&body)?;
        response.into_result()
    }

    fn cookies(&self) -> SessionCookies {
        let mut cookies = SessionCookies::new();
        for scope in COOKIE_SCOPE_URLS.iter().filter_map(|url| Url::parse(url).ok()) {
            let Some(header) = self.jar.cookies(&scope) else {
                continue;
            };
            let Ok(header) = header.to_str() else {
                continue;
            };
            for (name, value) in parse_cookie_header(header) {
                cookies.entry(name).or_insert(value);
            }
        }
        cookies
    }
}

/// Split a `Cookie:` header value into name/value pairs
pub(crate) fn parse_cookie_header(header: &str) -> SessionCookies {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("SESSDATA=s1%2Cx; bili_jct=j1;DedeUserID=1; broken; =x");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies["SESSDATA"], "s1%2Cx");
        assert_eq!(cookies["bili_jct"], "j1");
        assert_eq!(cookies["DedeUserID"], "1");
    }

    #[test]
    fn test_jar_cookies_are_extracted() {
        let transport = HttpTransport::new().unwrap();
        let origin = Url::parse("https://passport.bilibili.com/").unwrap();
        transport.jar.add_cookie_str(
            "SESSDATA=s1; Domain=.bilibili.com; Path=/",
            &origin,
        );
        transport.jar.add_cookie_str(
            "bili_jct=j1; Domain=.bilibili.com; Path=/",
            &origin,
        );

        let cookies = transport.cookies();
        assert_eq!(cookies.get("SESSDATA").map(String::as_str), Some("s1"));
        assert_eq!(cookies.get("bili_jct").map(String::as_str), Some("j1"));
        assert!(!cookies.contains_key("DedeUserID"));
    }

    #[test]
    fn test_host_only_login_cookies_are_extracted() {
        let transport = HttpTransport::new().unwrap();
        let origin = Url::parse("https://passport.bilibili.com/").unwrap();
        // No Domain attribute: only sent back to the login host itself
        transport.jar.add_cookie_str("bili_jct=j1; Path=/", &origin);
        transport.jar.add_cookie_str(
            "SESSDATA=s1; Domain=.bilibili.com; Path=/",
            &origin,
        );

        let cookies = transport.cookies();
        assert_eq!(cookies.get("SESSDATA").map(String::as_str), Some("s1"));
        assert_eq!(cookies.get("bili_jct").map(String::as_str), Some("j1"));
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn test_empty_jar() {
        let transport = HttpTransport::new().unwrap();
        assert!(transport.cookies().is_empty());
    }
}
