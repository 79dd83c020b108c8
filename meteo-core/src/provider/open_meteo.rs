//! Open-Meteo forecast and geocoding client. No API key required.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::{
    Config,
    assemble::{FORECAST_SERVICE, assemble, parse_payload},
    clock::{Clock, SystemClock},
    config::Endpoints,
    error::{WeatherError, truncate_body},
    geocode::{self, GEOCODING_SERVICE},
    model::{CitySuggestion, WeatherSnapshot},
};

use super::WeatherProvider;

const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

const HOURLY_FIELDS: &str =
    "temperature_2m,apparent_temperature,relativehumidity_2m,precipitation,dewpoint_2m,pressure_msl";
const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    endpoints: Endpoints,
    language: String,
    forecast_days: u8,
    search_count: u8,
    suggestion_count: u8,
    clock: Arc<dyn Clock>,
}

impl OpenMeteoProvider {
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(WeatherError::Client)?;

        Ok(Self {
            http,
            endpoints: config.endpoints.clone(),
            language: config.language.clone(),
            forecast_days: config.forecast_days,
            search_count: config.search_count,
            suggestion_count: config.suggestion_count,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the wall clock, e.g. with a [`crate::clock::FixedClock`].
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    async fn get_text(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, WeatherError> {
        tracing::debug!(service, url, "sending request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::from_request(service, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::from_request(service, e))?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                service,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot, WeatherError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("forecast_days", self.forecast_days.to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("temperature_unit", "celsius".to_string()),
            ("windspeed_unit", "kmh".to_string()),
            ("precipitation_unit", "mm".to_string()),
        ];

        let body = self
            .get_text(FORECAST_SERVICE, &self.endpoints.forecast_url, &query)
            .await?;
        let payload = parse_payload(&body)?;

        assemble(payload, self.clock.now())
    }

    async fn search(&self, name: &str, count: u8) -> Result<Vec<CitySuggestion>, WeatherError> {
        let query = [
            ("name", name.to_string()),
            ("count", count.to_string()),
            ("language", self.language.clone()),
            ("format", "json".to_string()),
        ];

        let body = self
            .get_text(GEOCODING_SERVICE, &self.endpoints.geocoding_url, &query)
            .await?;

        geocode::parse_response(&body)
    }

    async fn city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::CityNotFound(String::new()));
        }

        let candidates = self.search(city, self.search_count).await?;
        let place = geocode::pick_city(city, candidates)?;
        tracing::info!(query = city, resolved = %place.label(), "resolved city");

        let snapshot = self.forecast(place.latitude, place.longitude).await?;
        Ok(snapshot.with_place(&place))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        self.forecast(latitude, longitude).await.inspect_err(|e| {
            tracing::warn!(latitude, longitude, error = %e, "weather lookup by coordinates failed");
        })
    }

    async fn fetch_by_city_name(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.city(city).await.inspect_err(|e| {
            tracing::warn!(city, error = %e, "weather lookup by city failed");
        })
    }

    async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.search(query, self.suggestion_count)
            .await
            .inspect_err(|e| tracing::warn!(query, error = %e, "city suggestions failed"))
    }
}
