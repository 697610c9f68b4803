//! Field-matrix runtime configuration

use std::path::PathBuf;
use std::time::Duration;

use socmatrix_core::DEFAULT_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "https://classes.rutgers.edu/soc/api";
pub const DEFAULT_USER_AGENT: &str = "BetterCourseSchedulePlanner/field-matrix";
pub const DEFAULT_OUTPUT: &str = "docs/soc_field_matrix.csv";

/// Runtime configuration for a survey run
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    /// Whole-request bound for each fetch
    pub timeout: Duration,
    /// CSV destination; parent directories are created
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}
