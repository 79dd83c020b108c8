//! Auto-refreshing view.
//!
//! Periodic refreshes and manual searches typed on stdin run as independent
//! tasks. Their results come back over a channel tagged with the generation
//! they were issued under, and only the newest request may update the view.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use meteo_core::{Generation, LatestSnapshot, Outcome, WeatherError, WeatherProvider, WeatherSnapshot};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    time::MissedTickBehavior,
};

use crate::{
    cli::{Lookup, fetch},
    render,
};

#[derive(Debug)]
struct Completed {
    generation: Generation,
    lookup: Lookup,
    is_refresh: bool,
    result: Result<WeatherSnapshot, WeatherError>,
}

fn spawn_fetch(
    provider: &Arc<dyn WeatherProvider>,
    tx: &mpsc::Sender<Completed>,
    generation: Generation,
    lookup: Lookup,
    is_refresh: bool,
) {
    let provider = Arc::clone(provider);
    let tx = tx.clone();

    tokio::spawn(async move {
        let result = fetch(provider.as_ref(), &lookup).await;
        let _ = tx
            .send(Completed {
                generation,
                lookup,
                is_refresh,
                result,
            })
            .await;
    });
}

/// Where a refresh of the shown snapshot should go: its coordinates when a
/// city lookup resolved them, otherwise the lookup that produced it.
fn refresh_lookup(snapshot: &WeatherSnapshot, lookup: &Lookup) -> Lookup {
    match (snapshot.latitude, snapshot.longitude) {
        (Some(latitude), Some(longitude)) => Lookup::Coordinates {
            latitude,
            longitude,
        },
        _ => lookup.clone(),
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line, "q" | "quit" | "exit")
}

pub async fn run(
    provider: Arc<dyn WeatherProvider>,
    initial: Lookup,
    interval: Duration,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Completed>(16);
    let mut latest = LatestSnapshot::new();
    let mut refresh_target: Option<Lookup> = None;

    println!("Watching {initial}. Type a city name to switch, `q` to quit.");
    spawn_fetch(&provider, &tx, latest.begin(), initial, false);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(target) = refresh_target.clone() {
                    if let Some(generation) = latest.begin_refresh() {
                        tracing::debug!(%target, "auto-refresh");
                        spawn_fetch(&provider, &tx, generation, target, true);
                    }
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let query = line.trim();
                    if is_quit(query) {
                        break;
                    }
                    if !query.is_empty() {
                        spawn_fetch(&provider, &tx, latest.begin(), Lookup::City(query.to_string()), false);
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stopped reading stdin");
                    stdin_open = false;
                }
            },
            Some(done) = rx.recv() => {
                match latest.complete(done.generation, done.result, done.is_refresh) {
                    Outcome::Applied => {
                        if let Some(snapshot) = latest.current() {
                            refresh_target = Some(refresh_lookup(snapshot, &done.lookup));
                            println!();
                            print!("{}", render::snapshot(snapshot, &done.lookup, Utc::now()));
                        }
                    }
                    Outcome::Failed => {
                        if let Some(err) = latest.last_error() {
                            eprintln!("{} ({})", err.user_message(), done.lookup);
                        }
                    }
                    Outcome::Stale => {}
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use meteo_core::CitySuggestion;

    #[test]
    fn refresh_prefers_resolved_coordinates() {
        let lookup = Lookup::City("Porto".into());
        let mut snapshot: WeatherSnapshot = serde_json::from_value(serde_json::json!({
            "temperature": 15.0, "apparent_temperature": 14.0, "weather_code": 1,
            "wind_speed": 5.0, "wind_direction": null, "humidity": 70,
            "precipitation_hourly": 0.0, "pressure": null, "dewpoint": 9.0,
            "temp_min": 10.0, "temp_max": 18.0, "precipitation": 0.0,
            "precipitation_probability": null, "timezone_offset_seconds": 0,
            "current_hour_index": 0, "daily_forecast": [],
            "city_name": "Porto", "region": null, "country": "Portugal",
            "latitude": 41.15, "longitude": -8.61
        }))
        .unwrap();

        assert_eq!(
            refresh_lookup(&snapshot, &lookup),
            Lookup::Coordinates {
                latitude: 41.15,
                longitude: -8.61
            }
        );

        snapshot.latitude = None;
        assert_eq!(refresh_lookup(&snapshot, &lookup), lookup);
    }

    #[test]
    fn quit_words() {
        assert!(is_quit("q"));
        assert!(is_quit("exit"));
        assert!(!is_quit("Quito"));
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        async fn fetch_by_coordinates(&self, _: f64, _: f64) -> Result<WeatherSnapshot, WeatherError> {
            Err(WeatherError::CityNotFound("coords".into()))
        }

        async fn fetch_by_city_name(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
            Err(WeatherError::CityNotFound(city.to_string()))
        }

        async fn suggest_cities(&self, _: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn spawned_fetch_reports_its_generation() {
        let provider: Arc<dyn WeatherProvider> = Arc::new(FailingProvider);
        let (tx, mut rx) = mpsc::channel(1);
        let mut latest = LatestSnapshot::new();
        let generation = latest.begin();

        spawn_fetch(&provider, &tx, generation, Lookup::City("Xyz".into()), false);
        let done = rx.recv().await.unwrap();

        assert_eq!(done.generation, generation);
        assert!(!done.is_refresh);
        assert_eq!(
            latest.complete(done.generation, done.result, done.is_refresh),
            Outcome::Failed
        );
    }

    #[tokio::test]
    async fn refresh_is_held_back_while_search_runs() {
        let provider: Arc<dyn WeatherProvider> = Arc::new(FailingProvider);
        let (tx, mut rx) = mpsc::channel(2);
        let mut latest = LatestSnapshot::new();

        let search = latest.begin();
        spawn_fetch(&provider, &tx, search, Lookup::City("Paris".into()), false);
        assert!(latest.begin_refresh().is_none());

        let done = rx.recv().await.unwrap();
        assert_eq!(done.generation, search);
        assert_eq!(
            latest.complete(done.generation, done.result, done.is_refresh),
            Outcome::Failed
        );
        assert!(latest.begin_refresh().is_some());
    }
}
