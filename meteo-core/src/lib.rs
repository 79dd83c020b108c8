//! Core library for the `meteo` weather lookup.
//!
//! This crate defines:
//! - The Open-Meteo client behind the [`WeatherProvider`] trait
//! - Pure transforms from provider payloads to [`WeatherSnapshot`]s
//!   (current-hour selection, rounding, weather-code labels)
//! - Configuration and request-generation bookkeeping
//!
//! It is used by `meteo-cli`, but can also be reused by other front ends.

pub mod assemble;
pub mod clock;
pub mod conditions;
pub mod config;
pub mod daynight;
pub mod error;
pub mod geocode;
pub mod model;
pub mod provider;
pub mod refresh;
pub mod time_index;
pub mod units;

pub use conditions::{Classification, classify};
pub use config::{Config, Endpoints};
pub use daynight::is_night;
pub use error::{ErrorKind, WeatherError};
pub use model::{CitySuggestion, DailyEntry, WeatherSnapshot};
pub use provider::{WeatherProvider, open_meteo::OpenMeteoProvider, provider_from_config};
pub use refresh::{Generation, LatestSnapshot, Outcome};
pub use time_index::find_current_hour_index;
