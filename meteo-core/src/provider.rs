use crate::{
    Config,
    error::WeatherError,
    model::{CitySuggestion, WeatherSnapshot},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

/// Label used when a chosen place arrives without a name.
pub const UNKNOWN_CITY: &str = "Unknown city";

/// The boundary between the weather core and whatever presents it.
///
/// Implementations contain every failure: errors come back as
/// [`WeatherError`] values, already logged.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, WeatherError>;

    /// Resolve `city` to the first inhabited place and fetch its weather.
    async fn fetch_by_city_name(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;

    /// Autocomplete candidates for a partial city name, unfiltered.
    async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError>;

    /// Fetch weather for a place the user already picked from suggestions.
    async fn fetch_for_place(&self, place: &CitySuggestion) -> Result<WeatherSnapshot, WeatherError> {
        let snapshot = self
            .fetch_by_coordinates(place.latitude, place.longitude)
            .await?;

        let mut place = place.clone();
        if place.name.trim().is_empty() {
            place.name = UNKNOWN_CITY.to_string();
        }
        Ok(snapshot.with_place(&place))
    }
}

/// Construct the Open-Meteo provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
