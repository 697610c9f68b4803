//! Blocking JSON fetches with gzip sniffing.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface: the pipeline issues one request at a time.

use std::borrow::Cow;
use std::io::Read;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use flate2::read::MultiGzDecoder;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING};

use crate::error::{DecodeError, FetchError};

/// Default per-request bound (connect + headers + body)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gzip member header
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Build an HTTP client with a fixed user agent and whole-request timeout.
///
/// Built without reqwest's gzip feature, so compressed bodies reach
/// [`decode_body`] untouched.
pub fn http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Size and timing of one fetch
#[derive(Debug, Clone)]
pub struct FetchMeta {
    pub url: String,
    /// Decoded payload size in bytes
    pub bytes: usize,
    pub elapsed: Duration,
}

impl FetchMeta {
    pub fn duration_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// HTTP GET → (gunzip) → JSON.
///
/// Any non-2xx status, timeout or transport failure becomes
/// [`FetchError::Http`]; a body that does not inflate or parse becomes
/// [`FetchError::Decode`]. No retries.
pub fn fetch_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<(serde_json::Value, FetchMeta), FetchError> {
    let started = Instant::now();
    log::debug!("GET {url}");

    let (body, gzip_header) = SHARED_RUNTIME
        .handle()
        .block_on(async {
            let response = client
                .get(url)
                .header(ACCEPT, "application/json")
                .header(ACCEPT_ENCODING, "gzip")
                .send()
                .await?
                .error_for_status()?;

            let gzip_header = response
                .headers()
                .get(CONTENT_ENCODING)
                .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"gzip"));
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((body, gzip_header))
        })
        .map_err(|e| FetchError::from_reqwest(&e, url))?;

    let decode_err = |source| FetchError::Decode {
        url: url.to_string(),
        source,
    };
    let payload = decode_body(&body, gzip_header).map_err(decode_err)?;
    let value = serde_json::from_slice(&payload)
        .map_err(DecodeError::Json)
        .map_err(decode_err)?;

    let meta = FetchMeta {
        url: url.to_string(),
        bytes: payload.len(),
        elapsed: started.elapsed(),
    };
    log::debug!("{url}: {} bytes in {} ms", meta.bytes, meta.duration_ms());
    Ok((value, meta))
}

/// Inflate the body when the server said gzip or the bytes start with the
/// gzip magic; otherwise pass it through.
pub fn decode_body(body: &[u8], gzip_header: bool) -> Result<Cow<'_, [u8]>, DecodeError> {
    if !gzip_header && !body.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(body));
    }
    let mut out = Vec::with_capacity(body.len() * 4);
    MultiGzDecoder::new(body)
        .read_to_end(&mut out)
        .map_err(DecodeError::Gzip)?;
    Ok(Cow::Owned(out))
}
