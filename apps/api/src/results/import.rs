//! Spreadsheet import: maps an uploaded workbook onto an unpublished
//! `EventResult` preview.
//!
//! Sheets are routed by name (adult, children, preschool, top100; first rule
//! that matches the lowercased name wins, anything else is ignored). The first
//! row of a sheet is its header row. Blank rows are skipped before truncation.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::{join_error, AppError};
use crate::events::EventType;
use crate::results::models::{
    AgeCategory, EventResult, ResultBucket, ResultEntry, TOP100_LIMIT, TOP_POSITIONS_LIMIT,
};

pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

const IMPORT_FAILED: &str = "Error processing Excel file. Please check the format.";

const PARTICIPANT_ID_HEADERS: [&str; 2] = ["participantId", "Participant ID"];
const NAME_HEADERS: [&str; 2] = ["name", "Name"];
const SCORE_HEADERS: [&str; 2] = ["score", "Score"];
const REMARKS_HEADERS: [&str; 2] = ["remarks", "Remarks"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file '{0}'")]
    UnsupportedFile(String),

    #[error("workbook could not be read: {0}")]
    Workbook(#[from] calamine::Error),
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        warn!("Spreadsheet import rejected: {e}");
        match e {
            ImportError::UnsupportedFile(_) => AppError::Validation(
                "Please upload an Excel file (.xlsx or .xls)".to_string(),
            ),
            ImportError::Workbook(_) => AppError::Validation(IMPORT_FAILED.to_string()),
        }
    }
}

/// A cell value reduced to what the import cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Text rendering; whole numbers drop their fraction ("1001", not "1001.0").
    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    fn as_score(&self) -> f64 {
        match self {
            Cell::Number(n) if n.is_finite() => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// One worksheet: its name and every row, header row first.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

/// Maps a sheet name onto the ranked list it fills.
pub fn route_sheet(name: &str) -> Option<ResultBucket> {
    let lowered = name.to_lowercase();
    if lowered.contains("adult") {
        Some(ResultBucket::Age(AgeCategory::Adult))
    } else if lowered.contains("children") {
        Some(ResultBucket::Age(AgeCategory::Children))
    } else if lowered.contains("preschool") {
        Some(ResultBucket::Age(AgeCategory::Preschool))
    } else if lowered.contains("top100") {
        Some(ResultBucket::Top100)
    } else {
        None
    }
}

pub fn check_file_name(file_name: &str) -> Result<(), ImportError> {
    let lowered = file_name.to_lowercase();
    if ACCEPTED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedFile(file_name.to_string()))
    }
}

/// Reads every worksheet of an `.xlsx` / `.xls` workbook.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Vec<Sheet>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();
        sheets.push(Sheet { name, rows });
    }
    Ok(sheets)
}

/// Column positions resolved from a header row.
struct Columns {
    participant_id: Option<usize>,
    name: Option<usize>,
    score: Option<usize>,
    remarks: Option<usize>,
}

impl Columns {
    fn resolve(header: &[Cell]) -> Self {
        let find = |candidates: &[&str]| {
            candidates.iter().find_map(|wanted| {
                header
                    .iter()
                    .position(|cell| cell.as_text().as_deref() == Some(*wanted))
            })
        };
        Self {
            participant_id: find(&PARTICIPANT_ID_HEADERS),
            name: find(&NAME_HEADERS),
            score: find(&SCORE_HEADERS),
            remarks: find(&REMARKS_HEADERS),
        }
    }
}

fn cell(row: &[Cell], column: Option<usize>) -> Option<&Cell> {
    column.and_then(|i| row.get(i))
}

/// Turns a sheet's data rows into ranked entries, truncated to `limit`.
pub fn sheet_entries(
    sheet: &Sheet,
    event_type: EventType,
    category: AgeCategory,
    limit: usize,
    now_millis: i64,
) -> Vec<ResultEntry> {
    let Some((header, data)) = sheet.rows.split_first() else {
        return Vec::new();
    };
    let columns = Columns::resolve(header);

    data.iter()
        .filter(|row| !row.iter().all(Cell::is_blank))
        .take(limit)
        .enumerate()
        .map(|(index, row)| ResultEntry {
            participant_id: cell(row, columns.participant_id)
                .and_then(Cell::as_text)
                .unwrap_or_else(|| format!("{event_type}-{now_millis}-{index}")),
            name: cell(row, columns.name)
                .and_then(Cell::as_text)
                .unwrap_or_else(|| "Unknown".to_string()),
            age_category: category,
            position: index as u32 + 1,
            score: cell(row, columns.score).map(Cell::as_score).unwrap_or(0.0),
            remarks: cell(row, columns.remarks)
                .and_then(Cell::as_text)
                .unwrap_or_default(),
        })
        .collect()
}

/// Builds the unpublished preview from parsed sheets. A later sheet routed to
/// the same list replaces an earlier one.
pub fn build_preview(
    event_type: EventType,
    season: &str,
    sheets: &[Sheet],
    now_millis: i64,
) -> EventResult {
    let mut result = EventResult::draft(event_type, season);
    for sheet in sheets {
        match route_sheet(&sheet.name) {
            Some(ResultBucket::Age(category)) => {
                *result.top_positions.get_mut(category) =
                    sheet_entries(sheet, event_type, category, TOP_POSITIONS_LIMIT, now_millis);
            }
            Some(ResultBucket::Top100) => {
                result.top100 =
                    sheet_entries(sheet, event_type, AgeCategory::Adult, TOP100_LIMIT, now_millis);
            }
            None => {}
        }
    }
    result
}

/// Validates the upload, parses it off the async runtime and returns the preview.
pub async fn import_workbook(
    event_type: EventType,
    season: &str,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<EventResult, AppError> {
    check_file_name(file_name)?;

    let sheets = tokio::task::spawn_blocking(move || read_workbook(bytes))
        .await
        .map_err(|e| join_error("read_workbook", e))??;

    let preview = build_preview(event_type, season, &sheets, Utc::now().timestamp_millis());
    info!(
        "Imported '{}' for {} season {}: adult={} children={} preschool={} top100={}",
        file_name,
        event_type,
        season,
        preview.top_positions.adult.len(),
        preview.top_positions.children.len(),
        preview.top_positions.preschool.len(),
        preview.top100.len()
    );
    Ok(preview)
}
