use serde::Deserialize;

use crate::{error::WeatherError, model::CitySuggestion};

pub(crate) const GEOCODING_SERVICE: &str = "geocoding";

/// `results` is missing entirely when nothing matches.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(default)]
    pub results: Option<Vec<CitySuggestion>>,
}

pub(crate) fn parse_response(body: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
    let parsed: GeocodeResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::malformed(GEOCODING_SERVICE, e.to_string()))?;
    Ok(parsed.results.unwrap_or_default())
}

/// First candidate that is an inhabited place, in provider order.
///
/// Administrative areas, landmarks and the like are never a valid answer to
/// a city query, even when they are the only results.
pub fn pick_city(query: &str, candidates: Vec<CitySuggestion>) -> Result<CitySuggestion, WeatherError> {
    if candidates.is_empty() {
        return Err(WeatherError::CityNotFound(query.to_string()));
    }

    candidates
        .into_iter()
        .find(CitySuggestion::is_inhabited_place)
        .ok_or_else(|| WeatherError::NoInhabitedPlace(query.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn candidate(name: &str, code: Option<&str>) -> CitySuggestion {
        CitySuggestion {
            name: name.to_string(),
            admin1: None,
            country: Some("Brazil".into()),
            latitude: -23.5,
            longitude: -46.6,
            feature_code: code.map(str::to_string),
        }
    }

    #[test]
    fn no_results_is_city_not_found() {
        let err = pick_city("Nonexistent Place XYZ", Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CityNotFound);
    }

    #[test]
    fn only_regions_is_rejected() {
        let err = pick_city(
            "São Paulo",
            vec![candidate("São Paulo", Some("ADM1")), candidate("São Paulo", None)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoInhabitedPlace);
    }

    #[test]
    fn first_inhabited_candidate_wins() {
        let picked = pick_city(
            "São Paulo",
            vec![
                candidate("São Paulo state", Some("ADM1")),
                candidate("São Paulo", Some("PPLA")),
                candidate("São Paulo do Potengi", Some("PPL")),
            ],
        )
        .unwrap();
        assert_eq!(picked.name, "São Paulo");
    }

    #[test]
    fn parses_missing_results_as_empty() {
        let parsed = parse_response(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn parses_candidates() {
        let body = r#"{"results": [{
            "id": 2988507, "name": "Paris", "latitude": 48.85341, "longitude": 2.3488,
            "feature_code": "PPLC", "country": "France", "admin1": "Île-de-France"
        }]}"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].is_inhabited_place());
        assert_eq!(parsed[0].admin1.as_deref(), Some("Île-de-France"));
    }

    #[test]
    fn invalid_body_is_malformed() {
        let err = parse_response("<html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
