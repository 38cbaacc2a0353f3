//! Parsing of the "Meeting Patterns" spreadsheet cell.
//!
//! One cell holds one or more newline separated chunks, each shaped like
//! `2025-01-06 - 2025-04-07 | Mon Wed Fri | 10:00 a.m. - 10:50 a.m. | ALRD-Floor 2-Room 201`.
//! A malformed chunk is a value, not an abort: the ingester inspects the
//! skip reason and keeps going with the sibling chunks.

use crate::building_codes::BuildingDirectory;
use chrono::NaiveDate;
use chrono::NaiveTime;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // <building code>-Floor <digits>-Room <token>, anchored at the start
    static ref LOCATION_PATTERN: Regex = Regex::new(r"^([^-]+)-Floor (\d+)-Room (\S+)").unwrap();
}

/// One structured class meeting, straight out of a single pattern chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMeetingPattern {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Comma joined weekday tokens in source order, e.g. "Mon,Wed,Fri".
    /// Not sorted and not deduplicated.
    pub days: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Display label, "Room {room} - {code}".
    pub location: String,
    pub address: String,
    pub room: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternSkip {
    #[error("expected at least 4 pipe delimited fields, found {0}")]
    TooFewFields(usize),
    #[error("no weekday tokens in {0:?}")]
    NoDays(String),
    #[error("unparseable time range {0:?}")]
    BadTimeRange(String),
}

/// Parse one `|` delimited meeting pattern chunk into a structured entry.
///
/// The row level start/end dates are passed through untouched. Returns a
/// [`PatternSkip`] when the chunk should be dropped; the caller decides
/// whether to count or log it.
pub fn parse_meeting_pattern(
    chunk: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    buildings: &BuildingDirectory,
) -> Result<ParsedMeetingPattern, PatternSkip> {
    let parts = chunk.split('|').collect::<Vec<&str>>();

    if parts.len() < 4 {
        return Err(PatternSkip::TooFewFields(parts.len()));
    }

    let days_field = parts[1].trim();
    let time_field = parts[2].trim();
    let location_field = parts[3].trim();

    let days = days_field.split_whitespace().join(",");

    if days.is_empty() {
        return Err(PatternSkip::NoDays(days_field.to_string()));
    }

    let (start_time, end_time) = parse_time_range(time_field)
        .ok_or_else(|| PatternSkip::BadTimeRange(time_field.to_string()))?;

    let (code, room) = match LOCATION_PATTERN.captures(location_field) {
        Some(captures) => (
            captures.get(1).map(|m| m.as_str()).unwrap_or_default(),
            captures.get(3).map(|m| m.as_str()).unwrap_or_default(),
        ),
        None => (location_field, "Unknown"),
    };

    Ok(ParsedMeetingPattern {
        start_date,
        end_date,
        days,
        start_time,
        end_time,
        location: format!("Room {} - {}", room, code),
        address: buildings.resolve(code).to_string(),
        room: room.to_string(),
    })
}

/// "10:00 a.m. - 10:50 a.m." style ranges. Stray periods are stripped and
/// both sides read as 12 hour clock times. Degenerate ranges where the end
/// does not come after the start are rejected too.
fn parse_time_range(time_field: &str) -> Option<(NaiveTime, NaiveTime)> {
    let cleaned = time_field.replace('.', "").to_uppercase();

    let sides = cleaned.split('-').collect::<Vec<&str>>();

    if sides.len() != 2 {
        return None;
    }

    let start_time = NaiveTime::parse_from_str(sides[0].trim(), "%I:%M %p").ok()?;
    let end_time = NaiveTime::parse_from_str(sides[1].trim(), "%I:%M %p").ok()?;

    if start_time >= end_time {
        return None;
    }

    Some((start_time, end_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
        )
    }

    #[test]
    fn test_well_formed_chunk() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let parsed = parse_meeting_pattern(
            "2025-01-06 - 2025-04-07|Mon Wed|10:00 a.m. - 10:50 a.m.|ALRD-Floor 2-Room 201",
            start,
            end,
            &buildings,
        )
        .unwrap();

        assert_eq!(parsed.days, "Mon,Wed");
        assert_eq!(parsed.start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(parsed.end_time, NaiveTime::from_hms_opt(10, 50, 0).unwrap());
        assert_eq!(parsed.location, "Room 201 - ALRD");
        assert_eq!(parsed.address, "1822 East Mall");
        assert_eq!(parsed.room, "201");
        assert_eq!(parsed.start_date, start);
        assert_eq!(parsed.end_date, end);
    }

    #[test]
    fn test_afternoon_times() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let parsed = parse_meeting_pattern(
            "x|Tue Thu|2:00 p.m. - 3:20 p.m.|SWNG-Floor 1-Room 121",
            start,
            end,
            &buildings,
        )
        .unwrap();

        assert_eq!(parsed.start_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(parsed.end_time, NaiveTime::from_hms_opt(15, 20, 0).unwrap());
    }

    #[test]
    fn test_day_order_preserved_not_deduplicated() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let parsed = parse_meeting_pattern(
            "x|Wed Mon Wed|9:00 AM - 9:50 AM|MATH-Floor 1-Room 100",
            start,
            end,
            &buildings,
        )
        .unwrap();

        assert_eq!(parsed.days, "Wed,Mon,Wed");
    }

    #[test]
    fn test_unknown_building_code_keeps_chunk() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let parsed = parse_meeting_pattern(
            "x|Fri|1:00 p.m. - 2:00 p.m.|ZZZZ-Floor 3-Room 42",
            start,
            end,
            &buildings,
        )
        .unwrap();

        assert_eq!(parsed.address, crate::building_codes::UNKNOWN_ADDRESS);
        assert_eq!(parsed.location, "Room 42 - ZZZZ");
    }

    #[test]
    fn test_location_without_floor_room_shape() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let parsed = parse_meeting_pattern(
            "x|Mon|8:00 a.m. - 9:00 a.m.|Off Campus Studio",
            start,
            end,
            &buildings,
        )
        .unwrap();

        assert_eq!(parsed.room, "Unknown");
        assert_eq!(parsed.location, "Room Unknown - Off Campus Studio");
        assert_eq!(parsed.address, crate::building_codes::UNKNOWN_ADDRESS);
    }

    #[test]
    fn test_too_few_fields_is_a_skip() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let skip = parse_meeting_pattern("just some text", start, end, &buildings).unwrap_err();
        assert_eq!(skip, PatternSkip::TooFewFields(1));
    }

    #[test]
    fn test_malformed_time_range_is_a_skip() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        // no separator between the two times
        let skip = parse_meeting_pattern(
            "x|Mon Wed|10:00 a.m. 10:50 a.m.|ALRD-Floor 2-Room 201",
            start,
            end,
            &buildings,
        )
        .unwrap_err();
        assert!(matches!(skip, PatternSkip::BadTimeRange(_)));

        // garbage on one side
        let skip = parse_meeting_pattern(
            "x|Mon Wed|10:00 a.m. - later|ALRD-Floor 2-Room 201",
            start,
            end,
            &buildings,
        )
        .unwrap_err();
        assert!(matches!(skip, PatternSkip::BadTimeRange(_)));
    }

    #[test]
    fn test_end_before_start_is_a_skip() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let skip = parse_meeting_pattern(
            "x|Mon|3:00 p.m. - 2:00 p.m.|ALRD-Floor 2-Room 201",
            start,
            end,
            &buildings,
        )
        .unwrap_err();
        assert!(matches!(skip, PatternSkip::BadTimeRange(_)));
    }

    #[test]
    fn test_blank_day_field_is_a_skip() {
        let (start, end) = dates();
        let buildings = BuildingDirectory::ubc_vancouver();

        let skip = parse_meeting_pattern(
            "x| |10:00 a.m. - 10:50 a.m.|ALRD-Floor 2-Room 201",
            start,
            end,
            &buildings,
        )
        .unwrap_err();
        assert!(matches!(skip, PatternSkip::NoDays(_)));
    }
}
