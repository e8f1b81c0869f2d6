use crate::fetch::afd::{newest, product_url, AreaForecastDiscussion, ProductDetail, ProductList};
use crate::fetch::error::FetchError;
use bon::bon;
use log::{info, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = "metar-tool/0.1 (contact: you@example.com)";
pub const AVIATION_WEATHER_URL: &str = "https://aviationweather.gov/api/data";
pub const NWS_API_URL: &str = "https://api.weather.gov";

/// Bytes of an error response kept for diagnostics.
const ERROR_BODY_PREVIEW: usize = 300;

/// Body format requested from the METAR endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetarFormat {
    #[default]
    Raw,
    Json,
}

impl MetarFormat {
    pub fn query_value(self) -> &'static str {
        match self {
            MetarFormat::Raw => "raw",
            MetarFormat::Json => "json",
        }
    }

    fn accept(self) -> &'static str {
        match self {
            MetarFormat::Raw => "text/plain",
            MetarFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for MetarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

/// At most `limit` bytes of `body`, cut on a char boundary and trimmed.
fn body_preview(body: &str, limit: usize) -> &str {
    let mut end = body.len().min(limit);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].trim()
}

/// Re-indents a JSON document.
///
/// # Errors
///
/// Returns [`FetchError::JsonParse`] when `body` is not valid JSON.
pub fn pretty_json(body: &str) -> Result<String, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Blank bodies and an empty JSON array both mean the station had nothing.
fn is_empty_body(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty() || trimmed == "[]"
}

/// HTTP client for the aviation-weather METAR service and the NWS products API.
///
/// # Examples
///
/// ```rust
/// use metar_decoder::WeatherClient;
/// use std::time::Duration;
///
/// let client = WeatherClient::builder()
///     .timeout(Duration::from_secs(5))
///     .user_agent("my-tool/1.0".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(client.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    timeout: Duration,
    aviation_weather_url: String,
    nws_url: String,
}

#[bon]
impl WeatherClient {
    /// Creates a client. Every setting falls back to the public services and
    /// a ten second timeout when not given.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be set up.
    #[builder]
    pub fn new(
        timeout: Option<Duration>,
        user_agent: Option<String>,
        aviation_weather_url: Option<String>,
        nws_url: Option<String>,
    ) -> Result<Self, FetchError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let user_agent = user_agent
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(WeatherClient {
            http,
            timeout,
            aviation_weather_url: aviation_weather_url
                .unwrap_or_else(|| AVIATION_WEATHER_URL.to_string()),
            nws_url: nws_url.unwrap_or_else(|| NWS_API_URL.to_string()),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the latest METAR for a normalized station id.
    ///
    /// The trimmed body is returned: a raw report line, or the API's JSON
    /// array of observations.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoObservation`] when the service answers with an
    /// empty body or an empty array, besides the network and HTTP errors.
    pub async fn metar(&self, station: &str, format: MetarFormat) -> Result<String, FetchError> {
        let body = self.send(self.metar_request(station, format)).await?;
        if is_empty_body(&body) {
            warn!("Empty METAR response for station {}", station);
            return Err(FetchError::NoObservation(station.to_string()));
        }
        Ok(body.trim().to_string())
    }

    /// Fetches the newest Area Forecast Discussion issued by a forecast office.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoProducts`] when the office has no AFD products
    /// listed and [`FetchError::MissingProductId`] when the newest one has no
    /// id to look up.
    pub async fn latest_area_forecast_discussion(
        &self,
        wfo: &str,
    ) -> Result<AreaForecastDiscussion, FetchError> {
        let list_url = format!(
            "{}/products/types/AFD/locations/{}",
            self.nws_url.trim_end_matches('/'),
            wfo
        );
        let list: ProductList = self.get_json(&list_url).await?;
        info!("Found {} AFD product(s) for {}", list.graph.len(), wfo);

        let latest = newest(list.graph).ok_or_else(|| FetchError::NoProducts(wfo.to_string()))?;
        if latest.id.trim().is_empty() {
            return Err(FetchError::MissingProductId(wfo.to_string()));
        }

        let detail: ProductDetail = self
            .get_json(&product_url(&self.nws_url, &latest.id))
            .await?;
        Ok(AreaForecastDiscussion::new(wfo, &latest, detail))
    }

    /// The station goes through the query encoder, so it cannot add parameters.
    fn metar_request(&self, station: &str, format: MetarFormat) -> RequestBuilder {
        let url = format!("{}/metar", self.aviation_weather_url.trim_end_matches('/'));
        self.http
            .get(url)
            .query(&[
                ("ids", station),
                ("taf", "false"),
                ("format", format.query_value()),
            ])
            .header(ACCEPT, format.accept())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let request = self.http.get(url).header(ACCEPT, "application/geo+json");
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, FetchError> {
        let request = request.build().map_err(|e| {
            let url = e.url().map(|u| u.to_string()).unwrap_or_default();
            FetchError::NetworkRequest(url, e)
        })?;
        let url = request.url().to_string();
        info!("Requesting {}", url);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if let Some(e) = response.error_for_status_ref().err() {
            let body = response.text().await.unwrap_or_default();
            let body = body_preview(&body, ERROR_BODY_PREVIEW).to_string();
            warn!("HTTP error for {}: {:?}; body: {}", url, e, body);
            return Err(FetchError::HttpStatus {
                url,
                status,
                body,
                source: e,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        info!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metar_request_url() {
        let client = WeatherClient::builder().build().unwrap();
        let request = client.metar_request("KRDU", MetarFormat::Raw).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://aviationweather.gov/api/data/metar?ids=KRDU&taf=false&format=raw"
        );
        assert_eq!(request.headers()[ACCEPT], "text/plain");

        let client = WeatherClient::builder()
            .aviation_weather_url("http://localhost:8080/".to_string())
            .build()
            .unwrap();
        let request = client.metar_request("KTYS", MetarFormat::Json).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/metar?ids=KTYS&taf=false&format=json"
        );
    }

    #[tokio::test]
    async fn test_station_cannot_inject_query_parameters() {
        let client = WeatherClient::builder().build().unwrap();
        let request = client
            .metar_request("KRDU&format=json", MetarFormat::Raw)
            .build()
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("ids=KRDU%26format%3Djson&taf=false&format=raw")
        );
        let formats: Vec<_> = request
            .url()
            .query_pairs()
            .filter(|(key, _)| key == "format")
            .collect();
        assert_eq!(formats.len(), 1);
    }

    #[test]
    fn test_body_preview() {
        assert_eq!(body_preview("  not found \n", 300), "not found");
        assert_eq!(body_preview(&"x".repeat(500), 300).len(), 300);
        // The cut backs off to the start of a multi-byte char.
        assert_eq!(body_preview("aé", 2), "a");
    }

    #[test]
    fn test_empty_bodies() {
        assert!(is_empty_body(""));
        assert!(is_empty_body(" \n"));
        assert!(is_empty_body("[]\n"));
        assert!(!is_empty_body("KRDU 211251Z AUTO"));
        assert!(!is_empty_body("[{}]"));
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty_json(r#"[1,2]"#).unwrap(), "[\n  1,\n  2\n]");
        assert!(matches!(pretty_json("{oops"), Err(FetchError::JsonParse(_))));
    }

    #[tokio::test]
    async fn test_builder_defaults() {
        let client = WeatherClient::builder().build().unwrap();
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(client.aviation_weather_url, AVIATION_WEATHER_URL);
        assert_eq!(client.nws_url, NWS_API_URL);
    }

    #[tokio::test]
    async fn test_builder_overrides() {
        let client = WeatherClient::builder()
            .timeout(Duration::from_millis(500))
            .user_agent(" ".to_string())
            .nws_url("http://localhost:9000".to_string())
            .build()
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(500));
        assert_eq!(client.nws_url, "http://localhost:9000");
    }
}
