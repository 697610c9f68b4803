//! Schedule-of-classes API client

use anyhow::Context;
use reqwest::Url;
use socmatrix_core::{FetchError, FetchMeta, fetch_json, http_client};

use crate::config::Config;

/// Endpoints under the SOC API base path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Full course objects with nested sections
    Courses,
    /// Bare list of open section index strings
    OpenSections,
}

impl Endpoint {
    /// Path stem; the request path is `{base}/{api_name}.json`
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::OpenSections => "openSections",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}

/// One catalog query
#[derive(Clone, Copy, Debug)]
pub struct CatalogRequest<'a> {
    pub endpoint: Endpoint,
    pub year: u16,
    pub term: u8,
    pub campus: &'a str,
    pub level: Option<&'a str>,
}

/// Anything that can answer catalog queries with decoded JSON.
///
/// [`SocApi`] goes over HTTP; tests substitute canned payloads.
pub trait CatalogSource {
    fn fetch(
        &self,
        request: &CatalogRequest<'_>,
    ) -> Result<(serde_json::Value, FetchMeta), FetchError>;
}

/// Build `{base}/{endpoint}.json?year=..&term=..&campus=..[&level=..]`
pub fn endpoint_url(base: &Url, request: &CatalogRequest<'_>) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push(&format!("{}.json", request.endpoint.api_name()));
    }
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("year", &request.year.to_string())
            .append_pair("term", &request.term.to_string())
            .append_pair("campus", request.campus);
        if let Some(level) = request.level.filter(|l| !l.is_empty()) {
            query.append_pair("level", level);
        }
    }
    url
}

/// HTTP-backed catalog source
pub struct SocApi {
    base: Url,
    client: reqwest::Client,
}

impl SocApi {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        anyhow::ensure!(
            !base.cannot_be_a_base(),
            "API base URL cannot carry a path: {base}"
        );
        let client =
            http_client(&config.user_agent, config.timeout).context("Cannot build HTTP client")?;
        Ok(Self { base, client })
    }

    pub fn url_for(&self, request: &CatalogRequest<'_>) -> Url {
        endpoint_url(&self.base, request)
    }
}

impl CatalogSource for SocApi {
    fn fetch(
        &self,
        request: &CatalogRequest<'_>,
    ) -> Result<(serde_json::Value, FetchMeta), FetchError> {
        fetch_json(&self.client, self.url_for(request).as_str())
    }
}
