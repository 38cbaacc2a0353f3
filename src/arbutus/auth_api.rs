use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use diesel::ExpressionMethods;
use diesel::SelectableHelper;
use diesel::query_dsl::methods::FilterDsl;
use diesel::query_dsl::methods::SelectDsl;
use diesel_async::RunQueryDsl;
use quacktrack::models::User;
use quacktrack::postgres_tools::QuacktrackPostgresPool;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const TOKEN_LENGTH: usize = 48;
const TOKEN_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Deserialize, Clone, Debug)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoginRequest {
    email: String,
    password: String,
}

async fn load_user(
    pool: &QuacktrackPostgresPool,
    wanted_email: &str,
) -> Result<Option<User>, Box<dyn std::error::Error + Sync + Send>> {
    use quacktrack::schema::quacktrack::users::dsl::email;
    use quacktrack::schema::quacktrack::users::dsl::users;

    let mut conn = pool.get().await?;

    let rows = users
        .filter(email.eq(wanted_email))
        .select(User::as_select())
        .load::<User>(&mut conn)
        .await?;

    Ok(rows.into_iter().next())
}

#[actix_web::post("/auth/register")]
pub async fn register(
    pool: web::Data<Arc<QuacktrackPostgresPool>>,
    payload: web::Json<RegisterRequest>,
) -> impl Responder {
    use quacktrack::schema::quacktrack::users::dsl::users;

    let conn_pool = pool.as_ref();

    match load_user(conn_pool, &payload.email).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(json!({"detail": "Email already registered"}));
        }
        Ok(None) => {}
        Err(db_error) => {
            log::error!("user lookup failed: {}", db_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    }

    //generate a salted password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = match argon2.hash_password(payload.password.as_bytes(), &salt) {
        Ok(password_hash) => password_hash.to_string(),
        Err(hash_error) => {
            log::error!("password hashing failed: {}", hash_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Could not register user"}));
        }
    };

    let new_user = User {
        email: payload.email.clone(),
        username: payload.username.clone(),
        hash: password_hash,
        salt: salt.to_string(),
        created_ms: quacktrack::duration_since_unix_epoch().as_millis() as i64,
    };

    let mut conn = match conn_pool.get().await {
        Ok(conn) => conn,
        Err(pool_error) => {
            log::error!("could not get a database connection: {}", pool_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    let inserted = diesel::insert_into(users)
        .values(&new_user)
        .execute(&mut conn)
        .await;

    match inserted {
        Ok(_) => HttpResponse::Ok().json(json!({
            "username": new_user.username,
            "email": new_user.email
        })),
        Err(db_error) => {
            log::error!("user insert failed: {}", db_error);
            HttpResponse::InternalServerError().json(json!({"detail": "Could not register user"}))
        }
    }
}

#[actix_web::post("/auth/login")]
pub async fn login(
    pool: web::Data<Arc<QuacktrackPostgresPool>>,
    payload: web::Json<LoginRequest>,
) -> impl Responder {
    let user = match load_user(pool.as_ref(), &payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(json!({"detail": "Invalid credentials"}));
        }
        Err(db_error) => {
            log::error!("user lookup failed: {}", db_error);
            return HttpResponse::InternalServerError()
                .json(json!({"detail": "Database connection failed"}));
        }
    };

    let verified = match PasswordHash::new(&user.hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(payload.password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    };

    if !verified {
        return HttpResponse::Unauthorized().json(json!({"detail": "Invalid credentials"}));
    }

    let token = random_string::generate(TOKEN_LENGTH, TOKEN_CHARSET);

    HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "bearer"
    }))
}
