// Copyright Kyler Chin <kyler@catenarymaps.org>
// Catenary Transit Initiatives
// Attribution cannot be removed

mod auth_api;
mod map_api;
mod schedule_api;

use actix_cors::Cors;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, Responder, middleware, web};
use quacktrack::building_codes::BuildingDirectory;
use quacktrack::directions::DirectionsClient;
use quacktrack::directions::MapConfig;
use quacktrack::postgres_tools::make_async_pool;
use std::sync::Arc;

async fn index(_req: HttpRequest) -> impl Responder {
    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/plain"))
        .body("Welcome to the QuackTrack backend!")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Connect to the database.
    let pool = Arc::new(make_async_pool().await.unwrap());

    // All upstream configuration is resolved here once; the handlers only
    // ever see the constructed client.
    let api_key = std::env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set");
    let directions = Arc::new(DirectionsClient::new(MapConfig::new(api_key)).unwrap());

    let buildings = Arc::new(BuildingDirectory::ubc_vancouver());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:17432".to_string());

    // Create a new HTTP server.
    let builder = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .app_data(web::Data::new(Arc::clone(&pool)))
            .app_data(web::Data::new(Arc::clone(&directions)))
            .app_data(web::Data::new(Arc::clone(&buildings)))
            .route("/", web::get().to(index))
            .service(schedule_api::upload_csv)
            .service(schedule_api::list_schedules)
            .service(schedule_api::clear_schedules)
            .service(schedule_api::get_schedule)
            .service(schedule_api::delete_schedule)
            .service(map_api::transit_route)
            .service(map_api::car_route)
            .service(map_api::walk_route)
            .service(map_api::fastest_route)
            .service(map_api::route_polyline)
            .service(map_api::my_location)
            .service(auth_api::register)
            .service(auth_api::login)
    })
    .workers(4);

    let _ = builder.bind(bind_addr).unwrap().run().await;

    Ok(())
}
