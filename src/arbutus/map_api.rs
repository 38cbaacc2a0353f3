use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::http::StatusCode;
use actix_web::web;
use quacktrack::directions::DirectionsClient;
use quacktrack::directions::DirectionsError;
use quacktrack::directions::TravelMode;
use quacktrack::directions::selector::SelectorError;
use quacktrack::directions::selector::plan_fastest_route;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize, Clone, Debug)]
pub struct RouteRequest {
    origin: String,
    destination: String,
    /// Epoch seconds the caller wants to arrive by, usually "class start
    /// minus five minutes" from the mobile app.
    arrival_time: Option<i64>,
}

/// Map a fetch failure onto the status the caller should see. Upstream
/// errors keep their upstream status so "service misbehaving" stays
/// distinguishable from "no route exists".
fn route_error_response(error: DirectionsError) -> HttpResponse {
    match error {
        DirectionsError::Upstream { status, body } => {
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            HttpResponse::build(status)
                .json(json!({"detail": format!("Mapping service error: {}", body)}))
        }
        DirectionsError::NoRouteFound => {
            HttpResponse::NotFound().json(json!({"detail": "No route found."}))
        }
        DirectionsError::Unreachable(source) => {
            log::warn!("mapping service unreachable: {}", source);
            HttpResponse::ServiceUnavailable()
                .json(json!({"detail": "Could not reach the mapping service."}))
        }
    }
}

async fn single_mode_route(
    client: &DirectionsClient,
    request: &RouteRequest,
    mode: TravelMode,
) -> HttpResponse {
    let fetched = client
        .fetch_route(
            &request.origin,
            &request.destination,
            mode,
            request.arrival_time,
        )
        .await;

    match fetched {
        Ok(route) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": format!("{} route retrieved successfully.", mode.label()),
            "summary": route.summary,
            "duration": route.duration_text,
            "duration_value": route.duration_seconds,
            "steps": route.steps
        })),
        Err(error) => route_error_response(error),
    }
}

#[actix_web::post("/map/transit-route")]
pub async fn transit_route(
    client: web::Data<Arc<DirectionsClient>>,
    request: web::Json<RouteRequest>,
) -> impl Responder {
    single_mode_route(client.as_ref(), &request, TravelMode::Transit).await
}

#[actix_web::post("/map/car-route")]
pub async fn car_route(
    client: web::Data<Arc<DirectionsClient>>,
    request: web::Json<RouteRequest>,
) -> impl Responder {
    single_mode_route(client.as_ref(), &request, TravelMode::Driving).await
}

#[actix_web::post("/map/walk-route")]
pub async fn walk_route(
    client: web::Data<Arc<DirectionsClient>>,
    request: web::Json<RouteRequest>,
) -> impl Responder {
    single_mode_route(client.as_ref(), &request, TravelMode::Walking).await
}

/// Query every travel mode and answer with the survivors, fastest first.
#[actix_web::post("/map/fastest-route")]
pub async fn fastest_route(
    client: web::Data<Arc<DirectionsClient>>,
    request: web::Json<RouteRequest>,
) -> impl Responder {
    let planned = plan_fastest_route(
        client.as_ref(),
        &request.origin,
        &request.destination,
        request.arrival_time,
    )
    .await;

    match planned {
        Ok(routes) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Fastest route determined.",
            "routes": routes
        })),
        Err(SelectorError::NoModeAvailable) => HttpResponse::NotFound()
            .json(json!({"detail": "No available route from any travel mode."})),
    }
}

/// First encoded polyline found in the route's steps, plus its decoded
/// geojson line for callers that want to draw it directly.
#[actix_web::post("/map/polyline/{mode}")]
pub async fn route_polyline(
    path: web::Path<String>,
    client: web::Data<Arc<DirectionsClient>>,
    request: web::Json<RouteRequest>,
) -> impl Responder {
    let mode = match TravelMode::from_path(&path.into_inner()) {
        Some(mode) => mode,
        None => {
            return HttpResponse::BadRequest().json(json!({"detail": "Unknown travel mode"}));
        }
    };

    let fetched = client
        .as_ref()
        .fetch_route(
            &request.origin,
            &request.destination,
            mode,
            request.arrival_time,
        )
        .await;

    let route = match fetched {
        Ok(route) => route,
        Err(error) => return route_error_response(error),
    };

    let points = route.steps.iter().find_map(|step| {
        step.get("polyline")
            .and_then(|polyline| polyline.get("points"))
            .and_then(|points| points.as_str())
    });

    match points {
        Some(points) => {
            let geometry = polyline::decode_polyline(points, 5)
                .ok()
                .map(|line| geojson::Geometry::new(geojson::Value::from(&line)));

            HttpResponse::Ok().json(json!({
                "status": "success",
                "polyline": points,
                "geometry": geometry
            }))
        }
        None => HttpResponse::InternalServerError()
            .json(json!({"detail": "No polyline found in route steps."})),
    }
}

/// Proxy to the geolocation service, estimating the caller's position by IP.
#[actix_web::post("/map/my-location")]
pub async fn my_location(client: web::Data<Arc<DirectionsClient>>) -> impl Responder {
    match client.as_ref().my_location().await {
        Ok(location) => HttpResponse::Ok().json(location),
        Err(DirectionsError::Upstream { status, .. }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            HttpResponse::build(status).json(json!({"detail": "Failed to fetch location"}))
        }
        Err(DirectionsError::NoRouteFound) => {
            // geolocation has no routes, this arm is unreachable in practice
            HttpResponse::InternalServerError().json(json!({"detail": "Failed to fetch location"}))
        }
        Err(DirectionsError::Unreachable(source)) => {
            log::warn!("geolocation service unreachable: {}", source);
            HttpResponse::ServiceUnavailable()
                .json(json!({"detail": "Could not reach the geolocation service."}))
        }
    }
}
