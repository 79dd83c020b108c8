//! Turn a raw Open-Meteo forecast response into a [`WeatherSnapshot`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{DailyEntry, WeatherSnapshot},
    time_index::find_current_hour_index,
    units::{or_zero, percent, round1, value_at},
};

pub(crate) const FORECAST_SERVICE: &str = "forecast";

/// Forecast response as sent by the provider. Every section is optional here
/// so that a missing one is reported as malformed data, not a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub current_weather: Option<CurrentWeatherBlock>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherBlock {
    pub temperature: f64,
    pub weathercode: i32,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub winddirection: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(default)]
    pub dewpoint_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub pressure_msl: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

pub fn parse_payload(body: &str) -> Result<ForecastPayload, WeatherError> {
    serde_json::from_str(body).map_err(|e| WeatherError::malformed(FORECAST_SERVICE, e.to_string()))
}

/// Build the snapshot for instant `now`.
///
/// Hourly values are read at the hour covering local now; a missing hourly
/// temperature falls back to the current-weather reading.
pub fn assemble(payload: ForecastPayload, now: DateTime<Utc>) -> Result<WeatherSnapshot, WeatherError> {
    let current = payload
        .current_weather
        .ok_or_else(|| WeatherError::malformed(FORECAST_SERVICE, "missing current_weather section"))?;
    let hourly = payload
        .hourly
        .ok_or_else(|| WeatherError::malformed(FORECAST_SERVICE, "missing hourly section"))?;
    let daily = payload
        .daily
        .ok_or_else(|| WeatherError::malformed(FORECAST_SERVICE, "missing daily section"))?;

    let offset = payload.utc_offset_seconds.unwrap_or(0);
    let idx = find_current_hour_index(&hourly.time, offset, now);
    let at_hour = |series: &[Option<f64>]| value_at(series, idx);
    let today = |series: &[Option<f64>]| value_at(series, 0);

    let daily_forecast = daily_entries(&daily)?;

    Ok(WeatherSnapshot {
        temperature: round1(at_hour(&hourly.temperature_2m).unwrap_or(current.temperature)),
        apparent_temperature: round1(
            at_hour(&hourly.apparent_temperature).unwrap_or(current.temperature),
        ),
        weather_code: current.weathercode,
        wind_speed: round1(or_zero(current.windspeed)),
        wind_direction: current.winddirection,
        humidity: percent(at_hour(&hourly.relativehumidity_2m)).unwrap_or(0),
        precipitation_hourly: round1(or_zero(at_hour(&hourly.precipitation))),
        pressure: at_hour(&hourly.pressure_msl),
        dewpoint: round1(or_zero(at_hour(&hourly.dewpoint_2m))),
        temp_min: round1(or_zero(today(&daily.temperature_2m_min))),
        temp_max: round1(or_zero(today(&daily.temperature_2m_max))),
        precipitation: round1(or_zero(today(&daily.precipitation_sum))),
        precipitation_probability: percent(today(&daily.precipitation_probability_max)),
        timezone_offset_seconds: offset,
        current_hour_index: idx,
        daily_forecast,
        city_name: None,
        region: None,
        country: None,
        latitude: None,
        longitude: None,
    })
}

fn daily_entries(daily: &DailyBlock) -> Result<Vec<DailyEntry>, WeatherError> {
    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                WeatherError::malformed(FORECAST_SERVICE, format!("invalid daily date '{date}'"))
            })?;

            Ok(DailyEntry {
                date,
                weather_code: daily.weathercode.get(i).copied().flatten(),
                temp_max: round1(or_zero(value_at(&daily.temperature_2m_max, i))),
                temp_min: round1(or_zero(value_at(&daily.temperature_2m_min, i))),
                precipitation: round1(or_zero(value_at(&daily.precipitation_sum, i))),
                precipitation_probability: percent(value_at(&daily.precipitation_probability_max, i)),
            })
        })
        .collect()
}
