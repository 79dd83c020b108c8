use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use meteo_core::{
    CitySuggestion, Classification, DailyEntry, WeatherSnapshot, conditions::classify,
    time_index::local_now,
};

use crate::cli::Lookup;

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub fn compass(degrees: f64) -> &'static str {
    let sector = ((degrees.rem_euclid(360.0) + 22.5) / 45.0) as usize % COMPASS.len();
    COMPASS[sector]
}

fn place_label(snapshot: &WeatherSnapshot, lookup: &Lookup) -> String {
    match &snapshot.city_name {
        Some(name) => [Some(name.as_str()), snapshot.region.as_deref(), snapshot.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", "),
        None => lookup.to_string(),
    }
}

fn probability(value: Option<u8>) -> String {
    value.map_or_else(|| "–".to_string(), |p| format!("{p}%"))
}

/// Human-readable report: current conditions, today, then the coming days.
pub fn snapshot(snapshot: &WeatherSnapshot, lookup: &Lookup, now: DateTime<Utc>) -> String {
    let offset = Some(snapshot.timezone_offset_seconds);
    let current = classify(snapshot.weather_code, offset, now, false);
    let mut out = String::new();

    let _ = writeln!(out, "{}", place_label(snapshot, lookup));
    let _ = writeln!(
        out,
        "{}  {}  {:.1}°C (feels like {:.1}°C)",
        current.glyph, current.description, snapshot.temperature, snapshot.apparent_temperature
    );
    let _ = writeln!(
        out,
        "Today: {:.1}°C / {:.1}°C, precipitation {:.1} mm ({}), last hour {:.1} mm",
        snapshot.temp_min,
        snapshot.temp_max,
        snapshot.precipitation,
        probability(snapshot.precipitation_probability),
        snapshot.precipitation_hourly,
    );

    let wind = match snapshot.wind_direction {
        Some(deg) => format!("{:.1} km/h {}", snapshot.wind_speed, compass(deg)),
        None => format!("{:.1} km/h", snapshot.wind_speed),
    };
    let pressure = snapshot
        .pressure
        .map_or_else(|| "–".to_string(), |p| format!("{p:.0} hPa"));
    let _ = writeln!(
        out,
        "Wind {wind}  Humidity {}%  Pressure {pressure}  Dew point {:.1}°C",
        snapshot.humidity, snapshot.dewpoint
    );

    let today = local_now(now, snapshot.timezone_offset_seconds).date();
    let tomorrow = today.succ_opt().unwrap_or(today);
    let upcoming: Vec<&DailyEntry> = snapshot.upcoming_days(tomorrow).collect();
    if !upcoming.is_empty() {
        let _ = writeln!(out, "Next days:");
        for day in upcoming {
            let _ = writeln!(out, "  {}", day_line(day, offset, now));
        }
    }

    out
}

/// One forecast row. Future days always use the daytime label.
pub fn day_line(day: &DailyEntry, offset: Option<i32>, now: DateTime<Utc>) -> String {
    let label = day
        .weather_code
        .map_or(Classification::UNKNOWN, |code| classify(code, offset, now, true));

    format!(
        "{}  {}  {:<24} {:>5.1} / {:>5.1}°C  {:>5.1} mm  {:>4}",
        day.date.format("%a %d %b"),
        label.glyph,
        label.description,
        day.temp_min,
        day.temp_max,
        day.precipitation,
        probability(day.precipitation_probability),
    )
}

pub fn suggestion_line(position: usize, place: &CitySuggestion) -> String {
    format!(
        "{position:>2}. {}  ({:.4}, {:.4})",
        place.label(),
        place.latitude,
        place.longitude
    )
}
