//! Error types for catalog fetches

/// Error from decoding a response body that arrived intact over HTTP.
#[derive(Debug)]
pub enum DecodeError {
    /// Body looked gzipped but did not inflate
    Gzip(std::io::Error),
    /// Body was not valid JSON
    Json(serde_json::Error),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gzip(e) => write!(f, "gzip: {e}"),
            Self::Json(e) => write!(f, "JSON: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gzip(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

/// Error from a single catalog request.
///
/// Nothing retries on this error: the first failure aborts the run.
#[derive(Debug)]
pub enum FetchError {
    /// Non-2xx response, timeout or transport failure.
    ///
    /// `status` is `None` when no response was received at all.
    Http {
        status: Option<u16>,
        url: String,
        message: String,
    },
    /// Response received but the body could not be decoded
    Decode { url: String, source: DecodeError },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                url,
                ..
            } => write!(f, "HTTP {s} for {url}"),
            Self::Http {
                status: None,
                url,
                message,
            } => write!(f, "HTTP error for {url}: {message}"),
            Self::Decode { url, source } => write!(f, "cannot decode {url}: {source}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { .. } => None,
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl FetchError {
    /// Build from a reqwest error, keeping the status code when there is one.
    pub fn from_reqwest(e: &reqwest::Error, url: &str) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            url: url.to_string(),
            message: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Decode { .. } => None,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::Decode { url, .. } => url,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
