use diesel::ExpressionMethods;
use diesel::SelectableHelper;
use diesel::query_dsl::methods::FilterDsl;
use diesel::query_dsl::methods::SelectDsl;
use diesel_async::AsyncConnection;
use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use dotenvy::dotenv;
use quacktrack::models::NewSchedule;
use quacktrack::models::ScheduleRow;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + std::marker::Send + Sync>> {
    dotenv().ok();
    //test schedule round trip

    let mut conn = AsyncPgConnection::establish(&std::env::var("DATABASE_URL")?).await?;

    use quacktrack::schema::quacktrack::schedules::dsl::*;

    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        async move {
            let new_schedule = NewSchedule {
                class_name: "CPSC 110 - L1A".to_string(),
                start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
                days: "Mon,Wed,Fri".to_string(),
                start_time: chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: chrono::NaiveTime::from_hms_opt(10, 50, 0).unwrap(),
                location: "Room 201 - ALRD".to_string(),
                address: "1822 East Mall".to_string(),
                room: "201".to_string(),
            };

            let inserted: ScheduleRow = diesel::insert_into(schedules)
                .values(&new_schedule)
                .returning(ScheduleRow::as_returning())
                .get_result(conn)
                .await?;

            println!("Inserted schedule id {}", inserted.id);

            // fetch it back by id, every field must survive the round trip
            let fetched = schedules
                .filter(id.eq(inserted.id))
                .select(ScheduleRow::as_select())
                .load::<ScheduleRow>(conn)
                .await?;

            assert_eq!(fetched.len(), 1);
            assert_eq!(fetched[0], inserted);
            assert_eq!(fetched[0].class_name, "CPSC 110 - L1A");
            assert_eq!(fetched[0].days, "Mon,Wed,Fri");

            println!("Round trip ok");

            let deleted = diesel::delete(schedules.filter(id.eq(inserted.id)))
                .execute(conn)
                .await?;

            assert_eq!(deleted, 1);

            let after_delete = schedules
                .filter(id.eq(inserted.id))
                .select(ScheduleRow::as_select())
                .load::<ScheduleRow>(conn)
                .await?;

            assert!(after_delete.is_empty());

            println!("Delete ok, id no longer found");

            Ok(())
        }
        .scope_boxed()
    })
    .await;

    Ok(())
}
