//! Client for the external mapping service (Google Directions shaped API).
//!
//! Every query is a fresh upstream round trip, no caching. When the caller
//! wants to arrive by a fixed time with a mode the upstream cannot schedule
//! natively (driving, walking), a first estimation request learns the
//! expected duration and the departure time is back-calculated from it,
//! clamped to "now" when the constraint is already infeasible.

pub mod selector;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use std::time::Duration;

/// Upstream timeout for each round trip. A timeout is reported the same way
/// as an unreachable service.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
pub const DEFAULT_GEOLOCATION_URL: &str = "https://www.googleapis.com/geolocation/v1/geolocate";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Driving, TravelMode::Walking, TravelMode::Transit];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
        }
    }

    /// Capitalised form for user facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Driving => "Driving",
            TravelMode::Walking => "Walking",
            TravelMode::Transit => "Transit",
        }
    }

    pub fn from_path(raw: &str) -> Option<TravelMode> {
        match raw {
            "driving" => Some(TravelMode::Driving),
            "walking" => Some(TravelMode::Walking),
            "transit" => Some(TravelMode::Transit),
            _ => None,
        }
    }
}

/// Explicit configuration for the upstream calls, constructed once in main
/// and handed to [`DirectionsClient::new`]. Nothing here is read from
/// ambient state after startup.
#[derive(Clone, Debug)]
pub struct MapConfig {
    pub api_key: String,
    pub directions_url: String,
    pub geolocation_url: String,
}

impl MapConfig {
    pub fn new(api_key: String) -> MapConfig {
        MapConfig {
            api_key,
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DirectionsError {
    #[error("mapping service returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("no route found")]
    NoRouteFound,
    #[error("could not reach the mapping service: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// One normalised route as fetched for a single travel mode.
#[derive(Clone, Debug)]
pub struct FetchedRoute {
    pub mode: TravelMode,
    pub summary: String,
    pub duration_text: String,
    pub duration_seconds: i64,
    /// Turn-by-turn steps, verbatim from upstream. Steps may carry an
    /// embedded encoded polyline.
    pub steps: Vec<Value>,
}

// Upstream response shape. Only the fields this backend reads are typed,
// steps stay raw.
#[derive(Deserialize, Debug)]
struct UpstreamDirections {
    #[serde(default)]
    routes: Vec<UpstreamRoute>,
}

#[derive(Deserialize, Debug)]
struct UpstreamRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    legs: Vec<UpstreamLeg>,
}

#[derive(Deserialize, Debug)]
struct UpstreamLeg {
    duration: UpstreamDuration,
    #[serde(default)]
    steps: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct UpstreamDuration {
    text: String,
    value: i64,
}

enum TimingParam {
    ArrivalTime(i64),
    DepartureTime(i64),
}

pub struct DirectionsClient {
    http: reqwest::Client,
    config: MapConfig,
}

impl DirectionsClient {
    pub fn new(config: MapConfig) -> Result<DirectionsClient, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;

        Ok(DirectionsClient { http, config })
    }

    /// Fetch one route for one travel mode.
    ///
    /// `arrival_time` is epoch seconds. Transit passes it straight through,
    /// the upstream schedules around it natively. For driving and walking an
    /// extra untimed request estimates the duration first, and the departure
    /// time is derived as arrival minus duration, clamped to now when the
    /// arrival is no longer reachable.
    pub async fn fetch_route(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        arrival_time: Option<i64>,
    ) -> Result<FetchedRoute, DirectionsError> {
        let timing = match (arrival_time, mode) {
            (None, _) => None,
            (Some(arrival), TravelMode::Transit) => Some(TimingParam::ArrivalTime(arrival)),
            (Some(arrival), _) => {
                let estimate = self.directions_request(origin, destination, mode, None).await?;
                let estimated_duration = first_leg(&estimate)?.duration.value;

                let now = crate::duration_since_unix_epoch().as_secs() as i64;
                let departure = std::cmp::max(arrival - estimated_duration, now);

                Some(TimingParam::DepartureTime(departure))
            }
        };

        let response = self
            .directions_request(origin, destination, mode, timing)
            .await?;

        let route = response
            .routes
            .first()
            .ok_or(DirectionsError::NoRouteFound)?;
        let leg = first_leg(&response)?;

        Ok(FetchedRoute {
            mode,
            summary: route.summary.clone(),
            duration_text: leg.duration.text.clone(),
            duration_seconds: leg.duration.value,
            steps: leg.steps.clone(),
        })
    }

    async fn directions_request(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        timing: Option<TimingParam>,
    ) -> Result<UpstreamDirections, DirectionsError> {
        let mut params = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", mode.as_str().to_string()),
            ("key", self.config.api_key.clone()),
        ];

        match timing {
            Some(TimingParam::ArrivalTime(arrival)) => {
                params.push(("arrival_time", arrival.to_string()))
            }
            Some(TimingParam::DepartureTime(departure)) => {
                params.push(("departure_time", departure.to_string()))
            }
            None => {}
        }

        let response = self
            .http
            .get(&self.config.directions_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<UpstreamDirections>().await?)
    }

    /// Ask the geolocation service where this backend's caller probably is,
    /// based on IP. The upstream JSON body is forwarded untouched.
    pub async fn my_location(&self) -> Result<Value, DirectionsError> {
        let response = self
            .http
            .post(&self.config.geolocation_url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&serde_json::json!({ "considerIp": true }))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

fn first_leg(response: &UpstreamDirections) -> Result<&UpstreamLeg, DirectionsError> {
    response
        .routes
        .first()
        .and_then(|route| route.legs.first())
        .ok_or(DirectionsError::NoRouteFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_strings() {
        assert_eq!(TravelMode::Driving.as_str(), "driving");
        assert_eq!(TravelMode::Transit.label(), "Transit");
        assert_eq!(TravelMode::from_path("walking"), Some(TravelMode::Walking));
        assert_eq!(TravelMode::from_path("flying"), None);
    }

    #[test]
    fn test_upstream_response_parses() {
        let raw = serde_json::json!({
            "routes": [{
                "summary": "W 4th Ave",
                "legs": [{
                    "duration": { "text": "23 mins", "value": 1380 },
                    "steps": [
                        { "html_instructions": "Head north", "polyline": { "points": "abc" } }
                    ]
                }]
            }]
        });

        let parsed: UpstreamDirections = serde_json::from_value(raw).unwrap();
        let leg = first_leg(&parsed).unwrap();

        assert_eq!(parsed.routes[0].summary, "W 4th Ave");
        assert_eq!(leg.duration.value, 1380);
        assert_eq!(leg.steps.len(), 1);
    }

    #[test]
    fn test_empty_routes_is_no_route_found() {
        let parsed: UpstreamDirections = serde_json::from_value(serde_json::json!({
            "routes": [],
            "status": "ZERO_RESULTS"
        }))
        .unwrap();

        assert!(matches!(
            first_leg(&parsed),
            Err(DirectionsError::NoRouteFound)
        ));
    }

    #[test]
    fn test_missing_routes_key_is_tolerated() {
        let parsed: UpstreamDirections =
            serde_json::from_value(serde_json::json!({ "status": "OVER_QUERY_LIMIT" })).unwrap();

        assert!(parsed.routes.is_empty());
    }
}
