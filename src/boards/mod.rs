//! Upstream job-board access.
//!
//! Each board module owns the payload schema for its API and a pure
//! `normalize` function turning a raw body into [`JobRecord`]s. The
//! [`BoardClient`] trait is the seam the tracker fetches through, so tests
//! can swap the network out.

pub mod greenhouse;
pub mod lever;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::BoardEndpoints;
use crate::jobs::JobRecord;
use crate::registry::{BoardType, CompanyConfig};

/// Per-company fetch failure. Never aborts a check.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("request to {url} failed: {source}")]
    Unavailable {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Upstream posting ids arrive as numbers (Greenhouse) or strings (Lever)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostingId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingId::Number(n) => write!(f, "{}", n),
            PostingId::Text(s) => f.write_str(s),
        }
    }
}

#[async_trait]
pub trait BoardClient: Send + Sync {
    /// Fetch and normalize every open posting for `company`.
    ///
    /// An empty board is `Ok(vec![])`; only transport, status and shape
    /// problems are errors.
    async fn fetch(
        &self,
        company: &CompanyConfig,
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<JobRecord>, BoardError>;
}

/// [`BoardClient`] backed by the public Greenhouse and Lever APIs
pub struct HttpBoardClient {
    client: reqwest::Client,
    endpoints: BoardEndpoints,
}

impl HttpBoardClient {
    pub fn new(endpoints: BoardEndpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("job-tracker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Listing URL for a company on its board
    pub fn listing_url(&self, company: &CompanyConfig) -> String {
        match company.board {
            BoardType::Greenhouse => format!(
                "{}/{}/jobs",
                self.endpoints.greenhouse_api.trim_end_matches('/'),
                company.board_id
            ),
            BoardType::Lever => format!(
                "{}/{}",
                self.endpoints.lever_api.trim_end_matches('/'),
                company.board_id
            ),
        }
    }

    async fn get_body(&self, url: &str) -> Result<String, BoardError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| BoardError::Unavailable {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BoardError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|source| BoardError::Unavailable {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl BoardClient for HttpBoardClient {
    async fn fetch(
        &self,
        company: &CompanyConfig,
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<JobRecord>, BoardError> {
        let url = self.listing_url(company);
        debug!("Fetching {} board for {}: {}", company.board, company.name, url);

        let body = self.get_body(&url).await?;
        let jobs = match company.board {
            BoardType::Greenhouse => greenhouse::normalize(
                &body,
                company,
                &self.endpoints.greenhouse_board,
                fetched_at,
            )?,
            BoardType::Lever => lever::normalize(&body, company, fetched_at)?,
        };

        info!("Fetched {} jobs from {} ({})", jobs.len(), company.board, company.board_id);
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> HttpBoardClient {
        let endpoints = BoardEndpoints {
            greenhouse_api: "http://gh.test/v1/boards/".to_string(),
            greenhouse_board: "http://boards.gh.test".to_string(),
            lever_api: "http://lever.test/v0/postings".to_string(),
        };
        HttpBoardClient::new(endpoints, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn listing_urls_follow_each_board_api() {
        let client = client();
        let gh = CompanyConfig::new("Stripe", BoardType::Greenhouse, "stripe");
        let lv = CompanyConfig::new("Netflix", BoardType::Lever, "netflix");

        assert_eq!(client.listing_url(&gh), "http://gh.test/v1/boards/stripe/jobs");
        assert_eq!(client.listing_url(&lv), "http://lever.test/v0/postings/netflix");
    }

    /// Bind an ephemeral port that answers one request with `status` and `body`
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }

    fn local_client(base: &str) -> HttpBoardClient {
        let endpoints = BoardEndpoints {
            greenhouse_api: base.to_string(),
            greenhouse_board: "https://boards.greenhouse.io".to_string(),
            lever_api: base.to_string(),
        };
        HttpBoardClient::new(endpoints, Duration::from_secs(5)).unwrap()
    }

    fn stripe() -> CompanyConfig {
        CompanyConfig::new("Stripe", BoardType::Greenhouse, "stripe")
    }

    fn netflix() -> CompanyConfig {
        CompanyConfig::new("Netflix", BoardType::Lever, "netflix")
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let base = serve_once("503 Service Unavailable", "").await;

        let err = local_client(&base).fetch(&stripe(), Utc::now()).await.unwrap_err();

        match err {
            BoardError::Status { status, url } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/stripe/jobs"), "url: {url}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_greenhouse_board_is_ok() {
        let base = serve_once("200 OK", r#"{"jobs": []}"#).await;

        let jobs = local_client(&base).fetch(&stripe(), Utc::now()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn empty_lever_board_is_ok() {
        let base = serve_once("200 OK", "[]").await;

        let jobs = local_client(&base).fetch(&netflix(), Utc::now()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn greenhouse_postings_are_normalized_over_http() {
        let base = serve_once(
            "200 OK",
            r#"{"jobs": [{"id": 9, "title": "SRE", "location": {"name": "Remote"}, "absolute_url": "/stripe/jobs/9"}]}"#,
        )
        .await;

        let jobs = local_client(&base).fetch(&stripe(), Utc::now()).await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "gh_stripe_9");
        assert_eq!(jobs[0].url, "https://boards.greenhouse.io/stripe/jobs/9");
    }

    #[tokio::test]
    async fn html_body_is_malformed() {
        let base = serve_once("200 OK", "<html><body>maintenance</body></html>").await;

        let err = local_client(&base).fetch(&netflix(), Utc::now()).await.unwrap_err();
        assert!(matches!(err, BoardError::Malformed(_)));
    }

    #[tokio::test]
    async fn closed_port_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_client(&format!("http://{}", addr))
            .fetch(&stripe(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Unavailable { .. }));
    }

    #[test]
    fn posting_id_accepts_numbers_and_strings() {
        let ids: Vec<PostingId> = serde_json::from_str(r#"[42, "abc-1"]"#).unwrap();
        assert_eq!(ids[0].to_string(), "42");
        assert_eq!(ids[1].to_string(), "abc-1");
    }
}
