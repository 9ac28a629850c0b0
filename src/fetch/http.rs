// src/fetch/http.rs
// =============================================================================
// The HTTP client capability used by the crawler.
//
// Key functionality:
// - PageFetcher: the one operation the crawl needs from HTTP, "give me the
//   body of this URL", so tests can swap in an in-memory site
// - HttpFetcher: the reqwest implementation (plain GET, no cookies, no
//   custom headers, per-request timeout, redirects followed only while
//   they stay on the crawled site)
// - Detects the common failure modes (timeout, DNS, SSL, refused
//   connections, redirect loops, non-2xx statuses)
//
// Timeouts are the client's job; retries are deliberately absent.
//
// Rust concepts:
// - #[async_trait]: lets a trait have async methods and still be used as
//   Arc<dyn PageFetcher>
// - move closures: the redirect policy owns its copy of the Scope, because
//   reqwest keeps the policy for as long as the client lives
// =============================================================================

use crate::crawl::Scope;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

const MAX_REDIRECTS: usize = 5;

/// Anything that can turn a URL into response body bytes
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed fetcher
///
/// The client is created once and reused by every task (connection pooling).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client that never leaves `scope`, not even through a redirect
    pub fn new(timeout: Duration, scope: Scope) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(same_site_redirects(scope))
            .build()?;
        Ok(Self { client })
    }
}

// Follows up to MAX_REDIRECTS hops on the site; an off-site hop is not
// requested, the 3xx response is handed back instead
fn same_site_redirects(scope: Scope) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if !scope.contains(attempt.url()) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        // A 3xx only gets here when the policy refused to follow it
        let status = response.status();
        if status.is_redirection() {
            let target = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(FetchError::OffSiteRedirect(target));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(categorize_error)?;
        Ok(body.to_vec())
    }
}

// Maps a reqwest error onto the failure modes worth telling apart
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        // reqwest only says "error sending request"; the cause chain has
        // the resolver or socket details
        let detail = source_chain(&error).to_lowercase();
        if detail.contains("dns") || detail.contains("resolve") {
            FetchError::Dns
        } else if detail.contains("certificate") || detail.contains("ssl") || detail.contains("tls") {
            FetchError::Tls
        } else {
            FetchError::Connect(error_string)
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchError::Tls
    } else {
        FetchError::Transport(error_string)
    }
}

fn source_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> HttpFetcher {
        let (scope, _) = Scope::from_seed(&server.uri()).unwrap();
        HttpFetcher::new(Duration::from_secs(5), scope).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"/x\">x</a>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let body = fetcher_for(&server).fetch(&url).await.unwrap();
        assert_eq!(body, b"<a href=\"/x\">x</a>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let missing = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        assert_eq!(fetcher_for(&server).fetch(&missing).await, Err(FetchError::Status(404)));

        let broken = Url::parse(&format!("{}/broken", server.uri())).unwrap();
        assert_eq!(fetcher_for(&server).fetch(&broken).await, Err(FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        assert_eq!(fetcher_for(&server).fetch(&url).await.unwrap(), b"moved");
    }

    #[tokio::test]
    async fn test_off_site_redirect_is_not_followed() {
        let site = MockServer::start().await;
        let elsewhere = MockServer::start().await;

        let target = format!("{}/secret", elsewhere.uri());
        Mock::given(method("GET"))
            .and(path("/go"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", target.as_str()))
            .expect(1)
            .mount(&site)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
            .expect(0)
            .mount(&elsewhere)
            .await;

        let url = Url::parse(&format!("{}/go", site.uri())).unwrap();
        let err = fetcher_for(&site).fetch(&url).await.unwrap_err();
        assert_eq!(err, FetchError::OffSiteRedirect(target));

        assert!(elsewhere.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_loop_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/loop", server.uri())).unwrap();
        let err = fetcher_for(&server).fetch(&url).await.unwrap_err();
        assert_eq!(err, FetchError::TooManyRedirects);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let (scope, url) = Scope::from_seed(&server.uri()).unwrap();
        let fetcher = HttpFetcher::new(Duration::from_millis(100), scope).unwrap();
        assert_eq!(fetcher.fetch(&url).await, Err(FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_refused_connection_is_an_error() {
        // Bind and drop a listener to get a local port nobody listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let (scope, url) = Scope::from_seed(&format!("http://127.0.0.1:{port}/")).unwrap();
        let fetcher = HttpFetcher::new(Duration::from_secs(5), scope).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)), "{err:?}");
    }
}
