//! Conversion of the scraped head-to-head table into raw records.
//!
//! The comparison page renders a table whose header row is sometimes missing
//! or misaligned with the data cells (hidden columns are skipped on one but
//! not the other). When the widths disagree we fall back to the known column
//! layout of the page.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::models::{value_as_text, OddsField, RawMatchRecord};

/// Column layout of the comparison table when the header row is unusable.
const FALLBACK_COLUMNS: [&str; 12] = [
    "Date",
    "Tournament",
    "Round",
    "Team1",
    "T1_Stats",
    "T2_Stats",
    "Team2",
    "Win",
    "Draw",
    "Loss",
    "Exclude",
    "Details",
];

/// Header + cell grid exactly as extracted from the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTable {
    #[serde(default, deserialize_with = "lenient_headers")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub rows: Vec<Vec<String>>,
}

fn cell_text(value: &Value) -> String {
    value_as_text(value).unwrap_or_default()
}

fn lenient_headers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let headers = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(headers.iter().map(cell_text).collect())
}

/// Cells of any JSON type are read as text (`null` as empty); a row that is
/// not an array becomes an empty row.
fn lenient_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error> {
    let rows = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .map(|row| match row {
            Value::Array(cells) => cells.iter().map(cell_text).collect(),
            _ => Vec::new(),
        })
        .collect())
}

impl ScrapedTable {
    pub fn into_records(self) -> Vec<RawMatchRecord> {
        records_from_table(&self.headers, &self.rows)
    }
}

/// Resolve the column names to use for rows of the given width.
fn resolve_columns(headers: &[String], width: usize) -> Vec<String> {
    if headers.len() == width {
        return headers.iter().map(|h| h.trim().to_string()).collect();
    }
    let mut columns: Vec<String> = FALLBACK_COLUMNS
        .iter()
        .take(width)
        .map(|c| c.to_string())
        .collect();
    while columns.len() < width {
        columns.push(format!("Column_{}", columns.len() + 1));
    }
    columns
}

/// Build raw records from a scraped table. Cells are kept as text; parsing
/// and rejection happen in the validator.
pub fn records_from_table(headers: &[String], rows: &[Vec<String>]) -> Vec<RawMatchRecord> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let columns = resolve_columns(headers, first.len());
    let index_of = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));

    let date_idx = index_of("date");
    let win_idx = index_of("win");
    let draw_idx = index_of("draw");
    let loss_idx = index_of("loss");
    let tournament_idx = index_of("tournament");
    let host_idx = index_of("team1");
    let guest_idx = index_of("team2");

    let cell = |row: &Vec<String>, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    rows.iter()
        .map(|row| RawMatchRecord {
            date: cell(row, date_idx),
            win: cell(row, win_idx).map(OddsField::Text),
            draw: cell(row, draw_idx).map(OddsField::Text),
            loss: cell(row, loss_idx).map(OddsField::Text),
            tournament: cell(row, tournament_idx),
            host: cell(row, host_idx),
            guest: cell(row, guest_idx),
        })
        .collect()
}
