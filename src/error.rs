use std::path::PathBuf;

use thiserror::Error;

/// Configuration could not be loaded. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// The address list could not be read. Always fatal.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read address file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse address file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("address file {path} has no `wallet_address` column")]
    MissingColumn { path: PathBuf },
    #[error("address file {path} contains no addresses")]
    Empty { path: PathBuf },
}

/// A single balance or price request failed. Logged and skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid Ethereum address: {0}")]
    InvalidAddress(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API error: {message} - {result}")]
    Api { message: String, result: String },
    #[error("malformed API response: {0}")]
    Malformed(String),
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
}

/// The report could not be written. Always fatal.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum BalanceCheckerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
