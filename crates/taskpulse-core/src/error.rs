// crates/taskpulse-core/src/error.rs

use std::path::PathBuf;

use taskpulse_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("source {url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown timezone '{0}'")]
    Timezone(String),

    #[error("unknown department '{0}'")]
    UnknownDepartment(String),

    #[error("invalid source url '{url}': {message}")]
    SourceUrl { url: String, message: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParserError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
