use std::fmt;

use anyhow::anyhow;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use meteo_core::{
    CitySuggestion, Config, WeatherError, WeatherProvider, WeatherSnapshot, provider_from_config,
};

use crate::{configure, render, watch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather lookup by city or coordinates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit language, default city and refresh settings.
    Configure,

    /// Show the weather for a city or a pair of coordinates.
    Show {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List city candidates for a partial name.
    Suggest {
        query: String,

        /// Pick one candidate interactively and show its weather.
        #[arg(long)]
        pick: bool,
    },

    /// Keep showing the weather, refreshing periodically. Type another city
    /// name and press enter to switch; `q` quits.
    Watch {
        #[command(flatten)]
        target: TargetArgs,

        /// Refresh interval in seconds; defaults to the configured one.
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// City name, e.g. "Lisboa". Defaults to the configured city.
    pub city: Option<String>,

    #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", conflicts_with = "city", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

/// What to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Coordinates { latitude: f64, longitude: f64 },
    City(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{latitude:.4}, {longitude:.4}"),
            Lookup::City(name) => f.write_str(name),
        }
    }
}

impl TargetArgs {
    pub fn lookup(&self, config: &Config) -> anyhow::Result<Lookup> {
        if let (Some(latitude), Some(longitude)) = (self.lat, self.lon) {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(anyhow!(
                    "Coordinates out of range: latitude must be within ±90, longitude within ±180."
                ));
            }
            return Ok(Lookup::Coordinates {
                latitude,
                longitude,
            });
        }

        match self.city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() => Ok(Lookup::City(city.to_string())),
            _ => Ok(Lookup::City(config.default_city()?.to_string())),
        }
    }
}

pub async fn fetch(
    provider: &dyn WeatherProvider,
    lookup: &Lookup,
) -> Result<WeatherSnapshot, WeatherError> {
    match lookup {
        Lookup::Coordinates {
            latitude,
            longitude,
        } => provider.fetch_by_coordinates(*latitude, *longitude).await,
        Lookup::City(name) => provider.fetch_by_city_name(name).await,
    }
}

/// Wrap a lookup failure with a message suited to its kind.
fn user_error(err: WeatherError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

struct Choice(CitySuggestion);

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.label())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure::run(),
            Command::Show { target, json } => {
                let config = Config::load()?;
                let lookup = target.lookup(&config)?;
                let provider = provider_from_config(&config)?;

                let snapshot = fetch(provider.as_ref(), &lookup)
                    .await
                    .map_err(user_error)?;
                print_snapshot(&snapshot, &lookup, json)
            }
            Command::Suggest { query, pick } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;

                let suggestions = provider.suggest_cities(&query).await.map_err(user_error)?;
                if suggestions.is_empty() {
                    println!("No cities match '{query}'.");
                    return Ok(());
                }

                if !pick {
                    for (i, place) in suggestions.iter().enumerate() {
                        println!("{}", render::suggestion_line(i + 1, place));
                    }
                    return Ok(());
                }

                let choices = suggestions.into_iter().map(Choice).collect();
                let Choice(place) = inquire::Select::new("Which place?", choices).prompt()?;
                let snapshot = provider.fetch_for_place(&place).await.map_err(user_error)?;
                print_snapshot(&snapshot, &Lookup::City(place.name.clone()), false)
            }
            Command::Watch { target, interval } => {
                let config = Config::load()?;
                let lookup = target.lookup(&config)?;
                let provider = provider_from_config(&config)?;
                let interval = interval
                    .map(|secs| std::time::Duration::from_secs(secs.max(1)))
                    .unwrap_or_else(|| config.refresh_interval());

                watch::run(provider, lookup, interval).await
            }
        }
    }
}

fn print_snapshot(snapshot: &WeatherSnapshot, lookup: &Lookup, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        print!("{}", render::snapshot(snapshot, lookup, Utc::now()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::parse_from(["meteo", "show", "Lisboa"]);
        let Command::Show { target, json } = cli.command else {
            panic!("expected show");
        };
        assert!(!json);
        assert_eq!(
            target.lookup(&Config::default()).unwrap(),
            Lookup::City("Lisboa".into())
        );
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::parse_from(["meteo", "show", "--lat", "-23.55", "--lon", "-46.63", "--json"]);
        let Command::Show { target, json } = cli.command else {
            panic!("expected show");
        };
        assert!(json);
        assert_eq!(
            target.lookup(&Config::default()).unwrap(),
            Lookup::Coordinates {
                latitude: -23.55,
                longitude: -46.63
            }
        );
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["meteo", "show", "--lat", "10"]).is_err());
    }

    #[test]
    fn city_conflicts_with_coordinates() {
        assert!(
            Cli::try_parse_from(["meteo", "show", "Porto", "--lat", "1", "--lon", "2"]).is_err()
        );
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let target = TargetArgs {
            city: None,
            lat: Some(91.0),
            lon: Some(0.0),
        };
        assert!(target.lookup(&Config::default()).is_err());
    }

    #[test]
    fn falls_back_to_default_city() {
        let target = TargetArgs {
            city: None,
            lat: None,
            lon: None,
        };
        assert!(target.lookup(&Config::default()).is_err());

        let mut config = Config::default();
        config.set_default_city(Some("Recife".into()));
        assert_eq!(target.lookup(&config).unwrap(), Lookup::City("Recife".into()));
    }

    #[test]
    fn parses_watch_interval() {
        let cli = Cli::parse_from(["meteo", "watch", "Porto", "--interval", "120"]);
        let Command::Watch { interval, .. } = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(interval, Some(120));
    }
}
