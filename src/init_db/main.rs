use diesel_async::AsyncConnection;
use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl;
use dotenvy::dotenv;
use std::error::Error;

/// Creates the quacktrack schema and tables. Safe to run repeatedly.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Sync + Send>> {
    dotenv().ok();

    let mut conn = AsyncPgConnection::establish(&std::env::var("DATABASE_URL")?).await?;

    diesel::sql_query("CREATE SCHEMA IF NOT EXISTS quacktrack;")
        .execute(&mut conn)
        .await?;

    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS quacktrack.schedules (
            id SERIAL PRIMARY KEY,
            class_name text NOT NULL,
            start_date date NOT NULL,
            end_date date NOT NULL,
            days text NOT NULL,
            start_time time NOT NULL,
            end_time time NOT NULL,
            location text NOT NULL,
            address text NOT NULL,
            room text NOT NULL
        );",
    )
    .execute(&mut conn)
    .await?;

    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS quacktrack.users (
            email text NOT NULL PRIMARY KEY,
            username text NOT NULL,
            hash text NOT NULL,
            salt text NOT NULL,
            created_ms bigint NOT NULL
        );",
    )
    .execute(&mut conn)
    .await?;

    println!("Tables created successfully");

    Ok(())
}
