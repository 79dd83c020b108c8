//! WMO weather code → description and glyph.
//!
//! A single table keeps both halves for every code, so descriptions and
//! glyphs always cover the same set of codes.
//! See <https://open-meteo.com/en/docs#weathervariables>.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::daynight::is_night;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DayNight {
    day: &'static str,
    night: &'static str,
}

impl DayNight {
    const fn same(value: &'static str) -> Self {
        Self {
            day: value,
            night: value,
        }
    }

    const fn split(day: &'static str, night: &'static str) -> Self {
        Self { day, night }
    }

    fn pick(self, night: bool) -> &'static str {
        if night { self.night } else { self.day }
    }
}

struct CodeEntry {
    code: i32,
    description: DayNight,
    glyph: DayNight,
}

const fn entry(code: i32, description: DayNight, glyph: DayNight) -> CodeEntry {
    CodeEntry {
        code,
        description,
        glyph,
    }
}

const SUN: DayNight = DayNight::split("☀️", "🌕");
const SHOWERS: DayNight = DayNight::split("🌦️", "🌧️");
const RAIN: DayNight = DayNight::same("🌧️");
const SNOW: DayNight = DayNight::same("❄️");
const FOG: DayNight = DayNight::same("🌫️");
const STORM: DayNight = DayNight::same("⛈️");

static WEATHER_CODES: &[CodeEntry] = &[
    entry(0, DayNight::split("Clear sky", "Clear night"), SUN),
    entry(1, DayNight::split("Mainly clear", "Mainly clear night"), SUN),
    entry(2, DayNight::same("Partly cloudy"), DayNight::split("⛅", "☁️")),
    entry(3, DayNight::same("Overcast"), DayNight::same("☁️")),
    entry(45, DayNight::same("Fog"), FOG),
    entry(48, DayNight::same("Depositing rime fog"), FOG),
    entry(51, DayNight::same("Light drizzle"), SHOWERS),
    entry(53, DayNight::same("Moderate drizzle"), SHOWERS),
    entry(55, DayNight::same("Dense drizzle"), SHOWERS),
    entry(56, DayNight::same("Light freezing drizzle"), RAIN),
    entry(57, DayNight::same("Dense freezing drizzle"), RAIN),
    entry(61, DayNight::same("Slight rain"), SHOWERS),
    entry(63, DayNight::same("Moderate rain"), SHOWERS),
    entry(65, DayNight::same("Heavy rain"), SHOWERS),
    entry(66, DayNight::same("Light freezing rain"), RAIN),
    entry(67, DayNight::same("Heavy freezing rain"), RAIN),
    entry(71, DayNight::same("Slight snowfall"), SNOW),
    entry(73, DayNight::same("Moderate snowfall"), SNOW),
    entry(75, DayNight::same("Heavy snowfall"), SNOW),
    entry(77, DayNight::same("Snow grains"), SNOW),
    entry(80, DayNight::same("Slight rain showers"), SHOWERS),
    entry(81, DayNight::same("Moderate rain showers"), SHOWERS),
    entry(82, DayNight::same("Violent rain showers"), SHOWERS),
    entry(85, DayNight::same("Slight snow showers"), SNOW),
    entry(86, DayNight::same("Heavy snow showers"), SNOW),
    entry(95, DayNight::same("Thunderstorm"), STORM),
    entry(96, DayNight::same("Thunderstorm with slight hail"), STORM),
    entry(99, DayNight::same("Thunderstorm with heavy hail"), STORM),
];

/// Label for one weather code at one time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub description: &'static str,
    pub glyph: &'static str,
}

impl Classification {
    pub const UNKNOWN: Classification = Classification {
        description: "Unknown",
        glyph: "❓",
    };

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

fn lookup(code: i32) -> Option<&'static CodeEntry> {
    WEATHER_CODES.iter().find(|e| e.code == code)
}

/// Classify `code` with an explicit night flag.
pub fn classify_with(code: i32, night: bool) -> Classification {
    lookup(code).map_or(Classification::UNKNOWN, |e| Classification {
        description: e.description.pick(night),
        glyph: e.glyph.pick(night),
    })
}

/// Classify `code` for the location's time of day.
///
/// `force_day` is for forecast tiles of future days, which always use the
/// daytime variant regardless of the current hour.
pub fn classify(
    code: i32,
    utc_offset_seconds: Option<i32>,
    now: DateTime<Utc>,
    force_day: bool,
) -> Classification {
    let night = !force_day && is_night(utc_offset_seconds, now);
    classify_with(code, night)
}

pub fn describe(
    code: i32,
    utc_offset_seconds: Option<i32>,
    now: DateTime<Utc>,
    force_day: bool,
) -> &'static str {
    classify(code, utc_offset_seconds, now, force_day).description
}

pub fn glyph(
    code: i32,
    utc_offset_seconds: Option<i32>,
    now: DateTime<Utc>,
    force_day: bool,
) -> &'static str {
    classify(code, utc_offset_seconds, now, force_day).glyph
}

/// All codes with a known classification, in table order.
pub fn known_codes() -> impl Iterator<Item = i32> {
    WEATHER_CODES.iter().map(|e| e.code)
}
