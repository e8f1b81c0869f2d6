use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        /// Start of the response body, often the service's own explanation.
        body: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON data")]
    JsonParse(#[from] serde_json::Error),

    #[error("No METAR returned for {0}")]
    NoObservation(String),

    #[error("No AFD products found for WFO {0}")]
    NoProducts(String),

    #[error("Latest product missing id for WFO {0}")]
    MissingProductId(String),
}
