// src/core/net.rs
//
// Page fetching. One blocking GET per page, no retries.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use crate::config::consts::WIKI_PREFIX;
use crate::config::options::SourceOptions;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid page address `{page}`: {reason}")]
    InvalidPage { page: String, reason: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can turn a page address into raw markup.
///
/// `page` is a site-relative path (`/wiki/Iceland`) or an absolute URL.
/// Tests plug in an in-memory implementation.
pub trait Fetcher {
    fn fetch(&self, page: &str) -> Result<String, FetchError>;
}

/// Wiki path for a page title: spaces become underscores.
/// Paths and absolute URLs pass through untouched.
///
/// `"United States"` → `"/wiki/United_States"`
pub fn wiki_path(title: &str) -> String {
    let t = title.trim();
    if t.starts_with('/') || t.starts_with("http://") || t.starts_with("https://") {
        return s!(t);
    }
    join!(WIKI_PREFIX, &t.replace(' ', "_"))
}

pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(opts: &SourceOptions) -> Result<Self, FetchError> {
        let base = Url::parse(&opts.base_url).map_err(|e| FetchError::InvalidPage {
            page: opts.base_url.clone(),
            reason: e.to_string(),
        })?;
        let client = build_client(opts.timeout, &opts.user_agent)
            .map_err(|source| FetchError::Network { url: opts.base_url.clone(), source })?;
        Ok(Self { client, base })
    }

    fn url_for(&self, page: &str) -> Result<Url, FetchError> {
        if page.trim().is_empty() {
            return Err(FetchError::InvalidPage { page: s!(page), reason: s!("empty page address") });
        }
        self.base.join(page.trim()).map_err(|e| FetchError::InvalidPage {
            page: s!(page),
            reason: e.to_string(),
        })
    }
}

fn build_client(timeout: Duration, user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, page: &str) -> Result<String, FetchError> {
        let url = self.url_for(page)?;
        logd!("GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| classify(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = resp.text().map_err(|e| classify(&url, e))?;
        logd!("fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

fn classify(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Network { url: url.to_string(), source: e }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn wiki_path_from_title() {
        assert_eq!(wiki_path("Iceland"), "/wiki/Iceland");
        assert_eq!(wiki_path(" United States "), "/wiki/United_States");
        assert_eq!(wiki_path("/wiki/COVID-19_pandemic_in_Iceland"), "/wiki/COVID-19_pandemic_in_Iceland");
        assert_eq!(wiki_path("https://example.org/x"), "https://example.org/x");
    }

    #[test]
    fn urls_resolve_against_base() {
        let f = HttpFetcher::new(&SourceOptions::default()).unwrap();
        let u = f.url_for("/wiki/C%C3%B4te_d%27Ivoire").unwrap();
        assert_eq!(u.as_str(), "https://en.wikipedia.org/wiki/C%C3%B4te_d%27Ivoire");
        assert!(matches!(f.url_for("  "), Err(FetchError::InvalidPage { .. })));
    }

    /// One-shot local server: reads the request, waits `delay`, then sends `reply`.
    fn serve_once(reply: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                thread::sleep(delay);
                let _ = stream.write_all(reply.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn fetcher(base_url: String, timeout: Duration) -> HttpFetcher {
        HttpFetcher::new(&SourceOptions { base_url, timeout, ..SourceOptions::default() }).unwrap()
    }

    #[test]
    fn ok_response_returns_body() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 11\r\nConnection: close\r\n\r\n<p>hi</p>\r\n",
            Duration::ZERO,
        );
        let body = fetcher(base, Duration::from_secs(5)).fetch("/wiki/Iceland").unwrap();
        assert_eq!(body, "<p>hi</p>\r\n");
    }

    #[test]
    fn non_success_status_is_status_error() {
        let base = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        );
        let err = fetcher(base, Duration::from_secs(5)).fetch("/wiki/Iceland").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }), "{err:?}");
    }

    #[test]
    fn slow_server_is_timeout() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::from_secs(3),
        );
        let err = fetcher(base, Duration::from_millis(200)).fetch("/wiki/Iceland").unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "{err:?}");
    }

    #[test]
    fn closed_port_is_network_error() {
        // bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = fetcher(format!("http://{addr}"), Duration::from_secs(5))
            .fetch("/wiki/Iceland")
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
    }
}
