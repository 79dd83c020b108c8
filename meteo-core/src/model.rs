use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fully assembled weather result, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub weather_code: i32,
    pub wind_speed: f64,
    pub wind_direction: Option<f64>,
    pub humidity: u8,
    pub precipitation_hourly: f64,
    pub pressure: Option<f64>,
    pub dewpoint: f64,

    /// Today's values, from the first daily entry.
    pub temp_min: f64,
    pub temp_max: f64,
    pub precipitation: f64,
    pub precipitation_probability: Option<u8>,

    /// Seconds east of UTC at the target location.
    pub timezone_offset_seconds: i32,
    pub current_hour_index: usize,
    pub daily_forecast: Vec<DailyEntry>,

    /// Set only when the snapshot came from a named-city lookup.
    pub city_name: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: Option<i32>,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation: f64,
    pub precipitation_probability: Option<u8>,
}

/// Geocoding candidate for a free-text city query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub feature_code: Option<String>,
}

/// Feature codes of places people live in: populated place, capital,
/// first-order administrative seat.
pub const INHABITED_FEATURE_CODES: &[&str] = &["PPL", "PPLC", "PPLA"];

impl CitySuggestion {
    pub fn is_inhabited_place(&self) -> bool {
        self.feature_code
            .as_deref()
            .is_some_and(|code| INHABITED_FEATURE_CODES.contains(&code))
    }

    /// "Name, Region, Country" with missing parts left out.
    pub fn label(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl WeatherSnapshot {
    /// Attach the place a city lookup resolved to.
    pub fn with_place(mut self, place: &CitySuggestion) -> Self {
        self.city_name = Some(place.name.clone());
        self.region = place.admin1.clone();
        self.country = place.country.clone();
        self.latitude = Some(place.latitude);
        self.longitude = Some(place.longitude);
        self
    }

    /// Merge a refreshed snapshot over this one: weather fields come from
    /// `fresh`, place labels are kept unless `fresh` carries its own.
    pub fn refreshed_with(&self, fresh: WeatherSnapshot) -> WeatherSnapshot {
        if fresh.city_name.is_some() {
            return fresh;
        }

        WeatherSnapshot {
            city_name: self.city_name.clone(),
            region: self.region.clone(),
            country: self.country.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            ..fresh
        }
    }

    /// Daily entries dated `today` or later.
    pub fn upcoming_days(&self, today: NaiveDate) -> impl Iterator<Item = &DailyEntry> {
        self.daily_forecast.iter().filter(move |d| d.date >= today)
    }
}
