//! Retrieval of ranking pages.
//!
//! The scheduler only depends on the [`Fetch`] trait, so it can be driven by
//! the real HTTP client ([`HttpFetcher`]) or by an in-memory page table in
//! tests. There are no retries: a failed request is reported once and the
//! scheduler's failure policy decides what happens next.

use crate::error::{ConfigError, FetchError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// A successfully retrieved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

/// Something that can GET a ranking page.
///
/// The returned future carries no `Send` bound: the scheduler awaits genres
/// one at a time on the calling task. Implementors may write `async fn`.
pub trait Fetch {
    /// Retrieve `url`. Transport failures and non-2xx statuses are errors.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Page, FetchError>>;
}

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`Fetch`] implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "Fetched page");
        Ok(Page {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("comment_ranking-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ranking/comment/world"))
            .and(header("user-agent", "comment_ranking-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>国際</html>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/ranking/comment/world", server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<html>国際</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/ranking/comment/world", server.uri())).unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // nothing listens on port 9 of localhost
        let url = Url::parse("http://127.0.0.1:9/ranking").unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
