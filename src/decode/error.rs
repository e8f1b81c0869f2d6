use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Report has {token_count} token(s); at least 3 are needed for station and time")]
    MalformedReport { token_count: usize },

    #[error("No METAR content found in input")]
    NoContent,
}
