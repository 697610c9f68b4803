//! socmatrix core - plumbing shared by catalog field-coverage surveys
//!
//! Blocking JSON fetches with gzip sniffing, the error types they produce,
//! and logging/progress helpers for CLI output.

pub mod error;
pub mod logging;
pub mod progress;
pub mod stream;

// Re-exports for convenience
pub use error::{DecodeError, FetchError};
pub use logging::init_logging;
pub use progress::{ProgressContext, fmt_num};
pub use stream::{DEFAULT_TIMEOUT, FetchMeta, SHARED_RUNTIME, decode_body, fetch_json, http_client};
