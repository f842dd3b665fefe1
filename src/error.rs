use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("unable to parse survey csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: u64 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to parse {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid rating order {0:?}: expected each of joy, meh, despair exactly once")]
    InvalidOrder(String),

    #[error("unknown candy {0:?}")]
    UnknownCandy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
