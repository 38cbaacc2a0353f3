//! Turns an uploaded schedule export (CSV) into insertable rows.
//!
//! The export carries two preamble rows before the actual header row, then
//! one row per registered section. The "Meeting Patterns" cell holds one or
//! more newline separated chunks; each chunk becomes its own schedule row.
//! Malformed chunks are counted and dropped, they never abort the upload.

use crate::building_codes::BuildingDirectory;
use crate::meeting_pattern::parse_meeting_pattern;
use crate::models::NewSchedule;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use csv::StringRecord;
use thiserror::Error;

/// Section cells are sometimes blank in the export.
pub const UNKNOWN_CLASS: &str = "Unknown Class";

/// Rows above the header in the export.
const PREAMBLE_ROWS: usize = 2;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("could not read spreadsheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),
}

pub struct ImportOutcome {
    pub rows: Vec<NewSchedule>,
    /// Meeting pattern chunks dropped as unparseable.
    pub skipped: usize,
}

/// Parse the uploaded bytes into schedule rows plus a skip count.
///
/// Fails whole only on unreadable CSV or an absent required column; every
/// per-chunk problem is absorbed into `skipped`.
pub fn parse_schedule_csv(
    bytes: &[u8],
    buildings: &BuildingDirectory,
) -> Result<ImportOutcome, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = vec![];

    for record in reader.records() {
        records.push(record?);
    }

    let header = records
        .get(PREAMBLE_ROWS)
        .ok_or(ImportError::MissingColumn("Section"))?;

    let section_column = find_column(header, "Section")?;
    let start_date_column = find_column(header, "Start Date")?;
    let end_date_column = find_column(header, "End Date")?;
    let patterns_column = find_column(header, "Meeting Patterns")?;

    let mut rows = vec![];
    let mut skipped: usize = 0;

    for record in records.iter().skip(PREAMBLE_ROWS + 1) {
        let section = cell(record, section_column);

        let class_name = match section.is_empty() {
            true => UNKNOWN_CLASS.to_string(),
            false => section.to_string(),
        };

        let chunks = cell(record, patterns_column)
            .split('\n')
            .map(|chunk| chunk.trim())
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<&str>>();

        if chunks.is_empty() {
            continue;
        }

        let start_date = parse_date_cell(cell(record, start_date_column));
        let end_date = parse_date_cell(cell(record, end_date_column));

        let (start_date, end_date) = match (start_date, end_date) {
            (Some(start_date), Some(end_date)) => (start_date, end_date),
            _ => {
                log::debug!(
                    "skipping {} chunk(s) of {}: unreadable date range",
                    chunks.len(),
                    class_name
                );
                skipped += chunks.len();
                continue;
            }
        };

        for chunk in chunks {
            match parse_meeting_pattern(chunk, start_date, end_date, buildings) {
                Ok(pattern) => rows.push(NewSchedule::from_pattern(class_name.clone(), pattern)),
                Err(reason) => {
                    log::debug!("skipping meeting pattern chunk of {}: {}", class_name, reason);
                    skipped += 1;
                }
            }
        }
    }

    Ok(ImportOutcome { rows, skipped })
}

fn find_column(header: &StringRecord, name: &'static str) -> Result<usize, ImportError> {
    header
        .iter()
        .position(|cell| cell.trim() == name)
        .ok_or(ImportError::MissingColumn(name))
}

fn cell<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or_default().trim()
}

/// Date cells come through either bare or as a pandas style midnight stamp.
fn parse_date_cell(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|stamp| stamp.date())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &str = "View My Courses,,,\n,,,\n";

    fn wrap(rows: &str) -> Vec<u8> {
        format!(
            "{}Section,Start Date,End Date,Meeting Patterns\n{}",
            PREAMBLE, rows
        )
        .into_bytes()
    }

    #[test]
    fn test_one_valid_and_one_malformed_chunk() {
        let csv_bytes = wrap(
            "CPSC 110 - L1A,2025-01-06,2025-04-07,\"2025-01-06 - 2025-04-07|Mon Wed|10:00 a.m. - 10:50 a.m.|ALRD-Floor 2-Room 201\n2025-01-06 - 2025-04-07|Fri|sometime|ALRD-Floor 2-Room 201\"\n",
        );

        let buildings = BuildingDirectory::ubc_vancouver();
        let outcome = parse_schedule_csv(&csv_bytes, &buildings).unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.skipped, 1);

        let row = &outcome.rows[0];
        assert_eq!(row.class_name, "CPSC 110 - L1A");
        assert_eq!(row.days, "Mon,Wed");
        assert_eq!(row.address, "1822 East Mall");
        assert_eq!(row.room, "201");
    }

    #[test]
    fn test_blank_section_defaults_to_unknown_class() {
        let csv_bytes = wrap(
            ",2025-01-06,2025-04-07,x|Mon|9:00 a.m. - 9:50 a.m.|MATH-Floor 1-Room 100\n",
        );

        let buildings = BuildingDirectory::ubc_vancouver();
        let outcome = parse_schedule_csv(&csv_bytes, &buildings).unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].class_name, UNKNOWN_CLASS);
    }

    #[test]
    fn test_pandas_midnight_dates_accepted() {
        let csv_bytes = wrap(
            "MATH 100,2025-01-06 00:00:00,2025-04-07 00:00:00,x|Tue|11:00 a.m. - 11:50 a.m.|MATX-Floor 1-Room 1100\n",
        );

        let buildings = BuildingDirectory::ubc_vancouver();
        let outcome = parse_schedule_csv(&csv_bytes, &buildings).unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(
            outcome.rows[0].start_date,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_unreadable_dates_skip_only_that_row() {
        let csv_bytes = wrap(
            "HIST 101,whenever,2025-04-07,x|Mon|9:00 a.m. - 9:50 a.m.|BUCH-Floor 1-Room A101\nMATH 100,2025-01-06,2025-04-07,x|Tue|11:00 a.m. - 11:50 a.m.|MATH-Floor 1-Room 100\n",
        );

        let buildings = BuildingDirectory::ubc_vancouver();
        let outcome = parse_schedule_csv(&csv_bytes, &buildings).unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].class_name, "MATH 100");
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_rows_without_patterns_are_ignored() {
        let csv_bytes = wrap("PHYS 131,2025-01-06,2025-04-07,\n");

        let buildings = BuildingDirectory::ubc_vancouver();
        let outcome = parse_schedule_csv(&csv_bytes, &buildings).unwrap();

        assert_eq!(outcome.rows.len(), 0);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_missing_column_fails_whole_upload() {
        let csv_bytes =
            format!("{}Course,Start Date,End Date,Meeting Patterns\n", PREAMBLE).into_bytes();

        let buildings = BuildingDirectory::ubc_vancouver();
        let result = parse_schedule_csv(&csv_bytes, &buildings);

        assert!(matches!(result, Err(ImportError::MissingColumn("Section"))));
    }
}
