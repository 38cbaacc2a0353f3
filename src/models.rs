// Copyright Kyler Chin <kyler@catenarymaps.org>
// Catenary Transit Initiatives
// Attribution cannot be removed

use crate::meeting_pattern::ParsedMeetingPattern;
use chrono::NaiveDate;
use chrono::NaiveTime;
use diesel::prelude::*;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::quacktrack::schedules)]
pub struct ScheduleRow {
    pub id: i32,
    pub class_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub address: String,
    pub room: String,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::quacktrack::schedules)]
pub struct NewSchedule {
    pub class_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub address: String,
    pub room: String,
}

impl NewSchedule {
    pub fn from_pattern(class_name: String, pattern: ParsedMeetingPattern) -> NewSchedule {
        NewSchedule {
            class_name,
            start_date: pattern.start_date,
            end_date: pattern.end_date,
            days: pattern.days,
            start_time: pattern.start_time,
            end_time: pattern.end_time,
            location: pattern.location,
            address: pattern.address,
            room: pattern.room,
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::quacktrack::users)]
pub struct User {
    pub email: String,
    pub username: String,
    pub hash: String,
    pub salt: String,
    pub created_ms: i64,
}
