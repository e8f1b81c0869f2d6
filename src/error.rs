use crate::decode::error::DecodeError;
use crate::fetch::error::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetarError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Input looked like JSON but could not be decoded")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to create output file '{0}'")]
    OutputCreate(PathBuf, #[source] std::io::Error),

    #[error("Failed to read input")]
    InputRead(#[source] std::io::Error),

    #[error("Failed to write output")]
    OutputWrite(#[source] std::io::Error),
}
