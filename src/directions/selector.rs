//! Multi-mode route selection.
//!
//! Fires one fetch per travel mode, concurrently, and ranks whatever
//! survives. A mode failing is never a reason to fail the request; only
//! all three failing is.

use crate::LOCAL_TZ;
use crate::directions::DirectionsClient;
use crate::directions::DirectionsError;
use crate::directions::FetchedRoute;
use crate::directions::TravelMode;
use chrono::TimeZone;
use futures::future::join_all;
use serde_derive::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("no available route from any travel mode")]
    NoModeAvailable,
}

/// One survivor of the per-mode fan-out, with display times attached.
#[derive(Serialize, Clone, Debug)]
pub struct RankedRoute {
    pub mode: TravelMode,
    pub summary: String,
    pub duration: String,
    pub duration_value: i64,
    /// "HH:MM" wall clock in [`LOCAL_TZ`].
    pub departure_time: String,
    pub arrival_time: String,
    pub steps: Vec<Value>,
}

/// Query all travel modes and return the survivors sorted fastest first.
///
/// Each mode is awaited to its own timeout, there is no early exit. The
/// returned list is sorted ascending by duration in seconds; ties keep the
/// driving/walking/transit encounter order.
pub async fn plan_fastest_route(
    client: &DirectionsClient,
    origin: &str,
    destination: &str,
    arrival_time: Option<i64>,
) -> Result<Vec<RankedRoute>, SelectorError> {
    let fetches = TravelMode::ALL
        .iter()
        .map(|mode| client.fetch_route(origin, destination, *mode, arrival_time));

    let outcomes = join_all(fetches).await;

    let now = crate::duration_since_unix_epoch().as_secs() as i64;

    aggregate(
        TravelMode::ALL.iter().copied().zip(outcomes).collect(),
        arrival_time,
        now,
    )
}

/// Split the fan-out outcomes into survivors and failures, then rank the
/// survivors. Failures are skipped per mode; an empty survivor set is the
/// only overall failure.
fn aggregate(
    outcomes: Vec<(TravelMode, Result<FetchedRoute, DirectionsError>)>,
    arrival_time: Option<i64>,
    now: i64,
) -> Result<Vec<RankedRoute>, SelectorError> {
    let mut routes = vec![];
    let mut failures = vec![];

    for (mode, outcome) in outcomes {
        match outcome {
            Ok(route) => routes.push(route),
            Err(error) => {
                log::warn!("skipping {} route: {}", mode.as_str(), error);
                failures.push((mode, error));
            }
        }
    }

    if routes.is_empty() {
        log::warn!(
            "no travel mode produced a route, {} failure(s)",
            failures.len()
        );
        return Err(SelectorError::NoModeAvailable);
    }

    let mut ranked = routes
        .into_iter()
        .map(|route| {
            let (departure, arrival) = travel_window(route.duration_seconds, arrival_time, now);

            RankedRoute {
                mode: route.mode,
                summary: route.summary,
                duration: route.duration_text,
                duration_value: route.duration_seconds,
                departure_time: local_clock(departure),
                arrival_time: local_clock(arrival),
                steps: route.steps,
            }
        })
        .collect::<Vec<RankedRoute>>();

    // Vec::sort_by_key is stable, equal durations keep encounter order
    ranked.sort_by_key(|route| route.duration_value);

    Ok(ranked)
}

/// Derive (departure, arrival) epoch seconds for display.
///
/// With a target arrival the tentative departure is arrival minus duration;
/// when that already lies in the past the constraint is infeasible and the
/// window falls back to leaving now and arriving now plus duration.
pub fn travel_window(duration_seconds: i64, arrival_time: Option<i64>, now: i64) -> (i64, i64) {
    match arrival_time {
        Some(arrival) if arrival - duration_seconds >= now => {
            (arrival - duration_seconds, arrival)
        }
        _ => (now, now + duration_seconds),
    }
}

/// Epoch seconds to "HH:MM" in the reference timezone.
pub fn local_clock(epoch_seconds: i64) -> String {
    LOCAL_TZ
        .timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|stamp| stamp.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(mode: TravelMode, duration_seconds: i64) -> FetchedRoute {
        FetchedRoute {
            mode,
            summary: format!("{} via somewhere", mode.as_str()),
            duration_text: format!("{} mins", duration_seconds / 60),
            duration_seconds,
            steps: vec![],
        }
    }

    #[test]
    fn test_all_modes_failing_is_an_error() {
        let outcomes = vec![
            (TravelMode::Driving, Err(DirectionsError::NoRouteFound)),
            (
                TravelMode::Walking,
                Err(DirectionsError::Upstream {
                    status: 500,
                    body: String::from("boom"),
                }),
            ),
            (TravelMode::Transit, Err(DirectionsError::NoRouteFound)),
        ];

        assert!(matches!(
            aggregate(outcomes, None, 1_700_000_000),
            Err(SelectorError::NoModeAvailable)
        ));
    }

    #[test]
    fn test_single_mode_failure_is_skipped() {
        let outcomes = vec![
            (TravelMode::Driving, Ok(fetched(TravelMode::Driving, 600))),
            (TravelMode::Walking, Err(DirectionsError::NoRouteFound)),
            (TravelMode::Transit, Ok(fetched(TravelMode::Transit, 1200))),
        ];

        let ranked = aggregate(outcomes, None, 1_700_000_000).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].mode, TravelMode::Driving);
        assert_eq!(ranked[1].mode, TravelMode::Transit);
    }

    #[test]
    fn test_sorted_ascending_by_duration() {
        let outcomes = vec![
            (TravelMode::Driving, Ok(fetched(TravelMode::Driving, 900))),
            (TravelMode::Walking, Ok(fetched(TravelMode::Walking, 2400))),
            (TravelMode::Transit, Ok(fetched(TravelMode::Transit, 600))),
        ];

        let ranked = aggregate(outcomes, None, 1_700_000_000).unwrap();

        let durations = ranked
            .iter()
            .map(|route| route.duration_value)
            .collect::<Vec<i64>>();
        assert_eq!(durations, vec![600, 900, 2400]);
    }

    #[test]
    fn test_equal_durations_keep_encounter_order() {
        let outcomes = vec![
            (TravelMode::Driving, Ok(fetched(TravelMode::Driving, 600))),
            (TravelMode::Walking, Ok(fetched(TravelMode::Walking, 600))),
            (TravelMode::Transit, Ok(fetched(TravelMode::Transit, 600))),
        ];

        let ranked = aggregate(outcomes, None, 1_700_000_000).unwrap();

        let modes = ranked.iter().map(|route| route.mode).collect::<Vec<TravelMode>>();
        assert_eq!(
            modes,
            vec![TravelMode::Driving, TravelMode::Walking, TravelMode::Transit]
        );
    }

    #[test]
    fn test_feasible_arrival_back_calculates_departure() {
        let now = 1_700_000_000;
        let arrival = now + 3600;

        let (departure_time, arrival_time) = travel_window(600, Some(arrival), now);

        assert_eq!(departure_time, arrival - 600);
        assert_eq!(arrival_time, arrival);
    }

    #[test]
    fn test_infeasible_arrival_falls_back_to_leave_now() {
        let now = 1_700_000_000;
        // wanted to arrive 60s from now but the trip takes 600s
        let (departure_time, arrival_time) = travel_window(600, Some(now + 60), now);

        assert_eq!(departure_time, now);
        assert_eq!(arrival_time, now + 600);
    }

    #[test]
    fn test_no_constraint_leaves_now() {
        let now = 1_700_000_000;
        let (departure_time, arrival_time) = travel_window(600, None, now);

        assert_eq!(departure_time, now);
        assert_eq!(arrival_time, now + 600);
    }

    #[test]
    fn test_local_clock_renders_vancouver_time() {
        // 1970-01-01T00:00:00Z is 16:00 the previous day in Vancouver (PST)
        assert_eq!(local_clock(0), "16:00");
    }
}
