//! Geocoding clients
//!
//! Reverse geocoding goes through Nominatim, continent metadata through
//! REST Countries. Both sit behind async traits so the assistant can be
//! exercised without network access.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::{CountryInfo, GeoPoint, ReverseGeocodeResult};
use crate::{AssistantError, Result};

/// Resolves a point to address details
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, point: GeoPoint) -> Result<ReverseGeocodeResult>;
}

/// Looks up country-level metadata by ISO 3166-1 alpha-2 code
#[async_trait]
pub trait CountryDirectory: Send + Sync {
    /// Continent-level region of the country, `None` when unknown
    async fn continent(&self, country_code: &str) -> Result<Option<String>>;
}

fn build_http_client(config: &GeocodingConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| AssistantError::config(format!("Failed to create HTTP client: {e}")))
}

fn status_error(service: &str, status: StatusCode, error_text: &str) -> AssistantError {
    match status.as_u16() {
        429 => AssistantError::api(format!("{service} rate limit exceeded")),
        404 => AssistantError::api(format!("{service} has no entry for this request")),
        _ => AssistantError::api(format!("{service} error {status}: {error_text}")),
    }
}

async fn check_status(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(status_error(service, status, &error_text))
}

/// Continent from a REST Countries `/alpha/{code}` answer.
///
/// A 404 or a body that is not a list of countries means the code is not
/// listed, which is `Ok(None)` rather than a failed lookup.
pub(crate) fn continent_from_response(status: StatusCode, body: &str) -> Result<Option<String>> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(status_error("REST Countries", status, body));
    }

    let payload: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        AssistantError::parse(format!("Failed to parse REST Countries response: {e}"))
    })?;
    let serde_json::Value::Array(countries) = payload else {
        return Ok(None);
    };

    Ok(countries
        .into_iter()
        .next()
        .and_then(|country| serde_json::from_value::<CountryInfo>(country).ok())
        .and_then(|country| country.region)
        .filter(|region| !region.is_empty()))
}

/// Nominatim reverse geocoding client
pub struct NominatimClient {
    client: Client,
    base_url: String,
    zoom: u8,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
            zoom: config.zoom,
        })
    }

    fn reverse_url(&self, point: GeoPoint) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json&zoom={}&addressdetails=1",
            self.base_url, point.latitude, point.longitude, self.zoom
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    #[instrument(skip(self), fields(lat = point.latitude, lon = point.longitude))]
    async fn reverse(&self, point: GeoPoint) -> Result<ReverseGeocodeResult> {
        let url = self.reverse_url(point);
        debug!("Nominatim request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AssistantError::network(format!("Reverse geocoding request failed: {e}")))?;
        let response = check_status("Nominatim", response).await?;

        let result: ReverseGeocodeResult = response.json().await.map_err(|e| {
            AssistantError::parse(format!("Failed to parse Nominatim response: {e}"))
        })?;

        let elapsed = start_time.elapsed();
        info!(
            "Reverse geocoded {} in {:.3}s",
            point.format_coordinates(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 5 {
            warn!("Slow Nominatim response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(result)
    }
}

/// REST Countries client
pub struct RestCountriesClient {
    client: Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config
                .restcountries_base_url
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn alpha_url(&self, country_code: &str) -> String {
        format!(
            "{}/alpha/{}",
            self.base_url,
            urlencoding::encode(&country_code.to_uppercase())
        )
    }
}

#[async_trait]
impl CountryDirectory for RestCountriesClient {
    #[instrument(skip(self))]
    async fn continent(&self, country_code: &str) -> Result<Option<String>> {
        let url = self.alpha_url(country_code);
        debug!("REST Countries request URL: {}", url);

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                AssistantError::network(format!("Country lookup request failed: {e}"))
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AssistantError::network(format!("Failed to read REST Countries response: {e}"))
        })?;

        let continent = continent_from_response(status, &body)?;
        debug!("Continent for {}: {:?}", country_code, continent);
        Ok(continent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_url() {
        let client = NominatimClient::new(&GeocodingConfig::default()).unwrap();
        let url = client.reverse_url(GeoPoint::new(46.5, -7.25));
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/reverse?lat=46.5&lon=-7.25&format=json&zoom=10&addressdetails=1"
        );
    }

    #[test]
    fn test_alpha_url_upper_cases_code() {
        let config = GeocodingConfig {
            restcountries_base_url: "https://restcountries.com/v3.1/".to_string(),
            ..GeocodingConfig::default()
        };
        let client = RestCountriesClient::new(&config).unwrap();
        assert_eq!(
            client.alpha_url("nz"),
            "https://restcountries.com/v3.1/alpha/NZ"
        );
    }

    #[test]
    fn test_continent_from_rest_countries_payload() {
        let json = r#"[{"name": {"common": "Kenya"}, "region": "Africa", "subregion": "Eastern Africa"}]"#;
        let continent = continent_from_response(StatusCode::OK, json).unwrap();
        assert_eq!(continent.as_deref(), Some("Africa"));
    }

    #[test]
    fn test_unlisted_country_has_no_continent() {
        let not_found = r#"{"status": 404, "message": "Not Found"}"#;
        assert_eq!(
            continent_from_response(StatusCode::NOT_FOUND, not_found).unwrap(),
            None
        );
        assert_eq!(continent_from_response(StatusCode::OK, not_found).unwrap(), None);
        assert_eq!(continent_from_response(StatusCode::OK, "[]").unwrap(), None);
        assert_eq!(
            continent_from_response(StatusCode::OK, r#"[{"region": ""}]"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_continent_lookup_errors() {
        let unavailable = continent_from_response(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(matches!(unavailable, Err(AssistantError::Api { .. })));

        let garbled = continent_from_response(StatusCode::OK, "<html>");
        assert!(matches!(garbled, Err(AssistantError::Parse { .. })));
    }
}
