//! The assistant's user actions
//!
//! Each action starts from the map widget source (an embed address or the
//! page HTML around it), and reports back through the notification manager.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use tracing::{info, instrument, warn};

use crate::circle_map::CircleMap;
use crate::config::AssistantConfig;
use crate::geocoding::{CountryDirectory, NominatimClient, RestCountriesClient, ReverseGeocoder};
use crate::models::{GeoPoint, Radius};
use crate::notification::{Notification, NotificationManager, NotificationSink, StdoutSink};
use crate::{Result, extractor, geodesy};

pub const NO_COORDINATES: &str = "No coordinates found";
pub const UNKNOWN_CONTINENT: &str = "Unknown continent";
pub const UNKNOWN_COUNTRY: &str = "Unknown country";
pub const UNKNOWN_REGION: &str = "Unknown region";

/// A rendered answer circle and where it was written
#[derive(Debug, Clone)]
pub struct AnswerCircle {
    pub map: CircleMap,
    pub path: PathBuf,
}

pub struct Assistant {
    config: AssistantConfig,
    geocoder: Arc<dyn ReverseGeocoder>,
    countries: Arc<dyn CountryDirectory>,
    notifications: NotificationManager,
}

impl Assistant {
    pub fn new(
        config: AssistantConfig,
        geocoder: Arc<dyn ReverseGeocoder>,
        countries: Arc<dyn CountryDirectory>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let display_for = Duration::from_millis(config.notifications.display_ms);
        Self {
            config,
            geocoder,
            countries,
            notifications: NotificationManager::new(sink, display_for),
        }
    }

    /// Assistant backed by Nominatim and REST Countries, notifying on stdout
    pub fn from_config(config: AssistantConfig) -> Result<Self> {
        let geocoder = Arc::new(NominatimClient::new(&config.geocoding)?);
        let countries = Arc::new(RestCountriesClient::new(&config.geocoding)?);
        Ok(Self::new(config, geocoder, countries, Arc::new(StdoutSink)))
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// The current location, or the "no coordinates" notification it produced
    fn locate(&self, source: &str) -> std::result::Result<GeoPoint, Notification> {
        extractor::locate(source).ok_or_else(|| self.notifications.show(NO_COORDINATES))
    }

    /// Sample a point around the true location and write the answer-circle
    /// map. `radius_km` falls back to the configured default when absent and
    /// is rejected when non-positive.
    ///
    /// Returns `Ok(None)` when the source holds no coordinates.
    #[instrument(skip(self, source, rng))]
    pub fn show_answer_circle<R: RngExt + ?Sized>(
        &self,
        source: &str,
        radius_km: Option<f64>,
        output: Option<&Path>,
        rng: &mut R,
    ) -> Result<Option<AnswerCircle>> {
        let Ok(location) = self.locate(source) else {
            return Ok(None);
        };
        let radius = Radius::new(radius_km.unwrap_or(self.config.circle.default_radius_km))?;

        let center = geodesy::sample_with(rng, location, radius.km());
        let map = CircleMap::new(center, radius, &self.config.circle);
        let path = output.map_or_else(
            || PathBuf::from(&self.config.circle.output_path),
            Path::to_path_buf,
        );
        map.write_to(&path)?;

        self.notifications
            .show(format!("Answer circle written to {}", path.display()));
        Ok(Some(AnswerCircle { map, path }))
    }

    /// Report the continent of the current location
    #[instrument(skip(self, source))]
    pub async fn show_continent(&self, source: &str) -> Notification {
        let point = match self.locate(source) {
            Ok(point) => point,
            Err(notification) => return notification,
        };

        match self.lookup_continent(point).await {
            Ok(Some(continent)) => self.notifications.show(format!("🌍 {continent}")),
            Ok(None) => self.notifications.show(UNKNOWN_CONTINENT),
            Err(e) => {
                warn!("Continent lookup failed: {}", e);
                self.notifications.show("❌ Failed to fetch continent")
            }
        }
    }

    /// `Ok(None)` when the location has no country code
    async fn lookup_continent(&self, point: GeoPoint) -> Result<Option<String>> {
        let result = self.geocoder.reverse(point).await?;
        let Some(code) = result.country_code() else {
            info!("No country code for {}", point.format_coordinates());
            return Ok(None);
        };

        let continent = self.countries.continent(&code).await?;
        Ok(Some(
            continent.unwrap_or_else(|| UNKNOWN_CONTINENT.to_string()),
        ))
    }

    /// Report the country of the current location
    #[instrument(skip(self, source))]
    pub async fn show_country(&self, source: &str) -> Notification {
        let point = match self.locate(source) {
            Ok(point) => point,
            Err(notification) => return notification,
        };

        match self.geocoder.reverse(point).await {
            Ok(result) => {
                let country = result.country().unwrap_or(UNKNOWN_COUNTRY);
                self.notifications.show(format!("🌍 {country}"))
            }
            Err(e) => {
                warn!("Country lookup failed: {}", e);
                self.notifications.show("❌ Failed to fetch country")
            }
        }
    }

    /// Report the country and first-level region of the current location
    #[instrument(skip(self, source))]
    pub async fn show_country_region(&self, source: &str) -> Notification {
        let point = match self.locate(source) {
            Ok(point) => point,
            Err(notification) => return notification,
        };

        match self.geocoder.reverse(point).await {
            Ok(result) => {
                let country = result.country().unwrap_or(UNKNOWN_COUNTRY);
                let region = result.region().unwrap_or(UNKNOWN_REGION);
                self.notifications.show(format!("🌍 {country} – {region}"))
            }
            Err(e) => {
                warn!("Region lookup failed: {}", e);
                self.notifications.show("❌ Failed to fetch region")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssistantError;
    use crate::models::{Address, ReverseGeocodeResult};
    use crate::notification::tests::RecordingSink;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EMBED: &str = "https://www.google.com/maps/embed/v1/streetview?location=46.9480,7.4474";

    struct FixedGeocoder(Option<ReverseGeocodeResult>);

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn reverse(&self, _point: GeoPoint) -> Result<ReverseGeocodeResult> {
            self.0
                .clone()
                .ok_or_else(|| AssistantError::network("connection refused"))
        }
    }

    struct FixedCountries(Option<String>);

    #[async_trait]
    impl CountryDirectory for FixedCountries {
        async fn continent(&self, country_code: &str) -> Result<Option<String>> {
            assert_eq!(country_code, "CH");
            Ok(self.0.clone())
        }
    }

    /// Directory answering as REST Countries does for a code it does not list
    struct UnlistedCountries;

    #[async_trait]
    impl CountryDirectory for UnlistedCountries {
        async fn continent(&self, _country_code: &str) -> Result<Option<String>> {
            crate::geocoding::continent_from_response(
                reqwest::StatusCode::NOT_FOUND,
                r#"{"status": 404, "message": "Not Found"}"#,
            )
        }
    }

    fn bern() -> ReverseGeocodeResult {
        ReverseGeocodeResult {
            address: Some(Address {
                country: Some("Switzerland".to_string()),
                country_code: Some("ch".to_string()),
                state: Some("Bern".to_string()),
                ..Address::default()
            }),
        }
    }

    fn build_assistant(
        geocoded: Option<ReverseGeocodeResult>,
        continent: Option<&str>,
    ) -> (Assistant, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let assistant = Assistant::new(
            AssistantConfig::default(),
            Arc::new(FixedGeocoder(geocoded)),
            Arc::new(FixedCountries(continent.map(str::to_string))),
            sink.clone(),
        );
        (assistant, sink)
    }

    #[tokio::test]
    async fn test_show_continent() {
        let (assistant, _) = build_assistant(Some(bern()), Some("Europe"));
        let shown = assistant.show_continent(EMBED).await;
        assert_eq!(shown.text, "🌍 Europe");
        assert_eq!(assistant.notifications().current().as_deref(), Some("🌍 Europe"));
    }

    #[tokio::test]
    async fn test_show_continent_without_region() {
        let (assistant, _) = build_assistant(Some(bern()), None);
        let shown = assistant.show_continent(EMBED).await;
        assert_eq!(shown.text, "🌍 Unknown continent");
    }

    #[tokio::test]
    async fn test_show_continent_for_unlisted_country() {
        let assistant = Assistant::new(
            AssistantConfig::default(),
            Arc::new(FixedGeocoder(Some(bern()))),
            Arc::new(UnlistedCountries),
            Arc::new(RecordingSink::default()),
        );
        let shown = assistant.show_continent(EMBED).await;
        assert_eq!(shown.text, "🌍 Unknown continent");
    }

    #[tokio::test]
    async fn test_show_continent_without_country_code() {
        let (assistant, _) = build_assistant(Some(ReverseGeocodeResult::default()), Some("Europe"));
        let shown = assistant.show_continent(EMBED).await;
        assert_eq!(shown.text, UNKNOWN_CONTINENT);
    }

    #[tokio::test]
    async fn test_show_continent_failure() {
        let (assistant, _) = build_assistant(None, None);
        let shown = assistant.show_continent(EMBED).await;
        assert_eq!(shown.text, "❌ Failed to fetch continent");
    }

    #[tokio::test]
    async fn test_show_country() {
        let (assistant, _) = build_assistant(Some(bern()), None);
        assert_eq!(assistant.show_country(EMBED).await.text, "🌍 Switzerland");

        let (assistant, _) = build_assistant(Some(ReverseGeocodeResult::default()), None);
        assert_eq!(assistant.show_country(EMBED).await.text, "🌍 Unknown country");

        let (assistant, _) = build_assistant(None, None);
        assert_eq!(
            assistant.show_country(EMBED).await.text,
            "❌ Failed to fetch country"
        );
    }

    #[tokio::test]
    async fn test_show_country_region() {
        let (assistant, _) = build_assistant(Some(bern()), None);
        assert_eq!(
            assistant.show_country_region(EMBED).await.text,
            "🌍 Switzerland – Bern"
        );

        let (assistant, _) = build_assistant(Some(ReverseGeocodeResult::default()), None);
        assert_eq!(
            assistant.show_country_region(EMBED).await.text,
            "🌍 Unknown country – Unknown region"
        );

        let (assistant, _) = build_assistant(None, None);
        assert_eq!(
            assistant.show_country_region(EMBED).await.text,
            "❌ Failed to fetch region"
        );
    }

    #[tokio::test]
    async fn test_missing_coordinates_skips_lookup() {
        // the failing geocoder would produce a failure message if it were called
        let (assistant, sink) = build_assistant(None, None);
        let shown = assistant.show_country("<div>no map here</div>").await;
        assert_eq!(shown.text, NO_COORDINATES);
        assert_eq!(*sink.shown.lock().unwrap(), vec![NO_COORDINATES]);
    }

    #[tokio::test]
    async fn test_show_answer_circle_writes_map() {
        let (assistant, _) = build_assistant(None, None);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.html");
        let mut rng = StdRng::seed_from_u64(3);

        let circle = assistant
            .show_answer_circle(EMBED, Some(200.0), Some(&path), &mut rng)
            .unwrap()
            .unwrap();

        assert_eq!(circle.path, path);
        assert_eq!(circle.map.radius.km(), 200.0);
        let truth = GeoPoint::new(46.9480, 7.4474);
        assert!(truth.distance_km(&circle.map.center) <= 200.01);
        assert!(std::fs::read_to_string(&path).unwrap().contains("radius: 200000"));
    }

    #[tokio::test]
    async fn test_show_answer_circle_uses_default_radius() {
        let (assistant, _) = build_assistant(None, None);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.html");

        let circle = assistant
            .show_answer_circle(EMBED, None, Some(&path), &mut StdRng::seed_from_u64(9))
            .unwrap()
            .unwrap();
        assert_eq!(circle.map.radius.km(), 1500.0);
    }

    #[tokio::test]
    async fn test_show_answer_circle_rejects_bad_radius() {
        let (assistant, _) = build_assistant(None, None);
        let mut rng = StdRng::seed_from_u64(1);
        for radius in [0.0, -25.0, f64::NAN] {
            let result = assistant.show_answer_circle(EMBED, Some(radius), None, &mut rng);
            assert!(matches!(result, Err(AssistantError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_show_answer_circle_without_coordinates() {
        let (assistant, _) = build_assistant(None, None);
        let result = assistant
            .show_answer_circle("about:blank", Some(10.0), None, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(assistant.notifications().current().as_deref(), Some(NO_COORDINATES));
    }
}
