use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use diesel::ExpressionMethods;
use diesel::SelectableHelper;
use diesel::query_dsl::methods::FilterDsl;
use diesel::query_dsl::methods::SelectDsl;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use quacktrack::building_codes::BuildingDirectory;
use quacktrack::models::ScheduleRow;
use quacktrack::postgres_tools::QuacktrackPostgresPool;
use quacktrack::schedule_import::parse_schedule_csv;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize, Clone, Debug)]
pub struct UploadParams {
    filename: String,
}

/// Upload a schedule export and persist every parseable meeting pattern.
/// The whole batch goes through one transaction; unparseable chunks are
/// counted, not fatal.
#[actix_web::post("/schedule/upload-csv")]
pub async fn upload_csv(
    query: web::Query<UploadParams>,
    body: web::Bytes,
    pool: web::Data<Arc<QuacktrackPostgresPool>>,
    buildings: web::Data<Arc<BuildingDirectory>>,
) -> impl Responder {
    if !query.filename.to_lowercase().ends_with(".csv") {
        return HttpResponse::BadRequest().json(json!({"detail": "Invalid file format"}));
    }

    let outcome = match parse_schedule_csv(&body, buildings.as_ref().as_ref()) {
        Ok(outcome) => outcome,
        Err(import_error) => {
            return HttpResponse::BadRequest().json(json!({"detail": import_error.to_string()}));
        }
    };

    let conn_pool = pool.as_ref();
    let conn_pre = conn_pool.get().await;

    let mut conn = match conn_pre {
        Ok(conn) => conn,
        Err(pool_error) => {
            log::error!("could not get a database connection: {}", pool_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    let rows = outcome.rows;
    let skipped = outcome.skipped;

    let inserted = conn
        .transaction::<usize, diesel::result::Error, _>(|conn| {
            async move {
                use quacktrack::schema::quacktrack::schedules::dsl::schedules;

                diesel::insert_into(schedules).values(&rows).execute(conn).await
            }
            .scope_boxed()
        })
        .await;

    match inserted {
        Ok(inserted) => HttpResponse::Ok().json(json!({
            "message": "Schedule uploaded successfully",
            "inserted": inserted,
            "skipped": skipped
        })),
        Err(db_error) => {
            log::error!("schedule upload insert failed: {}", db_error);
            HttpResponse::InternalServerError().json(json!({"detail": "Could not save schedule"}))
        }
    }
}

#[actix_web::get("/schedule/")]
pub async fn list_schedules(pool: web::Data<Arc<QuacktrackPostgresPool>>) -> impl Responder {
    use quacktrack::schema::quacktrack::schedules::dsl::schedules;

    let conn_pool = pool.as_ref();
    let conn_pre = conn_pool.get().await;

    let mut conn = match conn_pre {
        Ok(conn) => conn,
        Err(pool_error) => {
            log::error!("could not get a database connection: {}", pool_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    let rows = schedules
        .select(ScheduleRow::as_select())
        .load::<ScheduleRow>(&mut conn)
        .await;

    match rows {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(db_error) => {
            log::error!("schedule list failed: {}", db_error);
            HttpResponse::InternalServerError().json(json!({"detail": "Could not load schedules"}))
        }
    }
}

#[actix_web::get("/schedule/{id}")]
pub async fn get_schedule(
    path: web::Path<i32>,
    pool: web::Data<Arc<QuacktrackPostgresPool>>,
) -> impl Responder {
    use quacktrack::schema::quacktrack::schedules::dsl::id;
    use quacktrack::schema::quacktrack::schedules::dsl::schedules;

    let schedule_id = path.into_inner();

    let conn_pool = pool.as_ref();
    let conn_pre = conn_pool.get().await;

    let mut conn = match conn_pre {
        Ok(conn) => conn,
        Err(pool_error) => {
            log::error!("could not get a database connection: {}", pool_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    let rows = schedules
        .filter(id.eq(schedule_id))
        .select(ScheduleRow::as_select())
        .load::<ScheduleRow>(&mut conn)
        .await;

    match rows {
        Ok(rows) => match rows.len() {
            0 => HttpResponse::NotFound().json(json!({"detail": "Schedule not found"})),
            _ => HttpResponse::Ok().json(&rows[0]),
        },
        Err(db_error) => {
            log::error!("schedule lookup failed: {}", db_error);
            HttpResponse::InternalServerError().json(json!({"detail": "Could not load schedule"}))
        }
    }
}

// registered before /schedule/{id} so the literal path wins
#[actix_web::delete("/schedule/clear-all")]
pub async fn clear_schedules(pool: web::Data<Arc<QuacktrackPostgresPool>>) -> impl Responder {
    use quacktrack::schema::quacktrack::schedules::dsl::schedules;

    let conn_pool = pool.as_ref();
    let conn_pre = conn_pool.get().await;

    let mut conn = match conn_pre {
        Ok(conn) => conn,
        Err(pool_error) => {
            log::error!("could not get a database connection: {}", pool_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    match diesel::delete(schedules).execute(&mut conn).await {
        Ok(_) => HttpResponse::Ok().json(json!({"message": "All schedules cleared"})),
        Err(db_error) => {
            log::error!("schedule clear failed: {}", db_error);
            HttpResponse::InternalServerError().json(json!({"detail": "Could not clear schedules"}))
        }
    }
}

#[actix_web::delete("/schedule/{id}")]
pub async fn delete_schedule(
    path: web::Path<i32>,
    pool: web::Data<Arc<QuacktrackPostgresPool>>,
) -> impl Responder {
    use quacktrack::schema::quacktrack::schedules::dsl::id;
    use quacktrack::schema::quacktrack::schedules::dsl::schedules;

    let schedule_id = path.into_inner();

    let conn_pool = pool.as_ref();
    let conn_pre = conn_pool.get().await;

    let mut conn = match conn_pre {
        Ok(conn) => conn,
        Err(pool_error) => {
            log::error!("could not get a database connection: {}", pool_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    let deleted = diesel::delete(schedules.filter(id.eq(schedule_id)))
        .execute(&mut conn)
        .await;

    match deleted {
        Ok(0) => HttpResponse::NotFound().json(json!({"detail": "Schedule not found"})),
        Ok(_) => HttpResponse::Ok().json(json!({"message": "Schedule deleted"})),
        Err(db_error) => {
            log::error!("schedule delete failed: {}", db_error);
            HttpResponse::InternalServerError().json(json!({"detail": "Could not delete schedule"}))
        }
    }
}
