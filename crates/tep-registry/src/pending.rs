//! Pending change request sources
//!
//! A pending source yields the titles of in-flight change requests. The
//! allocator reads numbers claimed in those titles so that a proposal under
//! review never loses its number to a new one.

use crate::error::SourceUnavailable;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;

/// Source of pending request titles
pub trait PendingSource {
    /// Label used in diagnostics
    fn name(&self) -> &str;

    /// Titles in the order the source returns them
    fn pending_titles(&self) -> Result<Vec<String>, SourceUnavailable>;
}

/// Fixed list of titles
///
/// Used for explicit offline runs and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPendingSource {
    titles: Vec<String>,
}

impl StaticPendingSource {
    /// Source returning the given titles
    #[must_use]
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    /// Source with no pending requests
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl PendingSource for StaticPendingSource {
    fn name(&self) -> &str {
        "static"
    }

    fn pending_titles(&self) -> Result<Vec<String>, SourceUnavailable> {
        Ok(self.titles.clone())
    }
}

#[derive(Debug, Deserialize)]
struct PullSummary {
    title: String,
}

/// Open pull requests of a GitHub repository
///
/// One blocking read, no retry; callers wrap it with their own policy.
#[derive(Debug, Clone)]
pub struct GithubPulls {
    url: String,
    client: Client,
}

impl GithubPulls {
    /// Client for the pulls endpoint at `url`
    pub fn new(url: impl Into<String>) -> Result<Self, SourceUnavailable> {
        let url = url.into();
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3.full+json"),
        );
        let client = Client::builder()
            .default_headers(headers)
            .user_agent("tekton-teps-client")
            .build()
            .map_err(|e| SourceUnavailable::new(url.clone(), e))?;
        Ok(Self { url, client })
    }
}

impl PendingSource for GithubPulls {
    fn name(&self) -> &str {
        &self.url
    }

    fn pending_titles(&self) -> Result<Vec<String>, SourceUnavailable> {
        let unavailable = |e: reqwest::Error| SourceUnavailable::new(self.url.clone(), e);
        let pulls: Vec<PullSummary> = self
            .client
            .get(&self.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(unavailable)?
            .json()
            .map_err(unavailable)?;

        tracing::debug!(source = %self.url, count = pulls.len(), "fetched pending requests");
        Ok(pulls.into_iter().map(|pull| pull.title).collect())
    }
}
