//! Result presentation.
//!
//! A [`Presenter`] turns a [`ResultView`] (sorted rows, sort state, summary)
//! into output. The table presenter mirrors the columns of the web results
//! table; the JSON presenter emits the records with their wire names.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculate::ClanSummary;
use crate::models::{AttacksLeftBadge, ClanTag, MemberRecord, SortDirection, SortState};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a presenter needs to draw one result set.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub tag: Option<ClanTag>,
    pub sort: SortState,
    pub summary: ClanSummary,
    pub records: Vec<MemberRecord>,
}

/// Renders a result set.
pub trait Presenter {
    fn render(&self, view: &ResultView) -> Result<String, RenderError>;
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn presenter(self) -> Box<dyn Presenter> {
        match self {
            OutputFormat::Table => Box::new(TablePresenter),
            OutputFormat::Json => Box::new(JsonPresenter),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected table or json)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// A results table column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Sort key wire name
    pub key: &'static str,
    pub label: &'static str,
    pub numeric: bool,
}

pub const COLUMNS: [Column; 8] = [
    Column { key: "recommendationScore", label: "Rank", numeric: false },
    Column { key: "playerName", label: "Player", numeric: false },
    Column { key: "townHall", label: "Town Hall", numeric: true },
    Column { key: "cumAttacksPossible", label: "Attacks Possible", numeric: true },
    Column { key: "attacksLeft", label: "Attacks Missed", numeric: true },
    Column { key: "avgDestruction", label: "Avg Destruction %", numeric: true },
    Column { key: "lastUpdated", label: "Last Updated", numeric: false },
    Column { key: "playerID", label: "Player ID", numeric: false },
];

const MISSING: &str = "-";

/// One record formatted for display, cells in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub cells: Vec<String>,
    pub badge: Option<AttacksLeftBadge>,
}

impl DisplayRow {
    pub fn from_record(record: &MemberRecord) -> Self {
        let badge = record.attacks_left_badge();
        let attacks_left = match (record.attacks_left, badge) {
            (Some(n), Some(badge)) => format!("{} [{}]", n, badge),
            _ => MISSING.to_string(),
        };

        let cells = vec![
            record
                .recommendation_rank
                .map_or_else(|| MISSING.to_string(), |rank| format!("#{}", rank)),
            text_cell(record.player_name.as_deref()),
            number_cell(record.town_hall),
            number_cell(record.cum_attacks_possible),
            attacks_left,
            number_cell(record.avg_destruction.map(f64::round)),
            format_date(record.last_updated.as_deref()),
            text_cell(record.player_id.as_deref()),
        ];

        Self { cells, badge }
    }
}

/// Rows for a sorted record list.
pub fn display_rows(records: &[MemberRecord]) -> Vec<DisplayRow> {
    records.iter().map(DisplayRow::from_record).collect()
}

fn text_cell(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => MISSING.to_string(),
    }
}

fn number_cell(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |n| n.to_string())
}

/// Format an ISO-8601 timestamp as a short date ("Mar 05, 2025").
///
/// Unparseable input is shown as-is; absent input as `-`.
pub fn format_date(iso: Option<&str>) -> String {
    let iso = match iso {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return MISSING.to_string(),
    };

    const FORMAT: &str = "%b %d, %Y";

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(iso, pattern) {
            return dt.format(FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }

    iso.to_string()
}

/// The line shown above the table.
pub fn summary_line(tag: Option<&ClanTag>, summary: &ClanSummary) -> String {
    format!(
        "Showing {} members for {} • Attacks used: {} / {} • Avg destruction per attack: {}%",
        summary.members,
        tag.map_or(MISSING, |t| t.as_str()),
        summary.total_attacks_used,
        summary.total_attacks_possible,
        summary.avg_destruction,
    )
}

/// Plain-text aligned table.
pub struct TablePresenter;

impl TablePresenter {
    fn header(column: &Column, sort: &SortState) -> String {
        if column.key == sort.key.as_str() {
            let marker = match sort.direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            };
            format!("{} {}", column.label, marker)
        } else {
            column.label.to_string()
        }
    }
}

impl Presenter for TablePresenter {
    fn render(&self, view: &ResultView) -> Result<String, RenderError> {
        if view.records.is_empty() {
            return Ok("No results to display.\n".to_string());
        }

        let headers: Vec<String> = COLUMNS
            .iter()
            .map(|column| Self::header(column, &view.sort))
            .collect();
        let rows = display_rows(&view.records);

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String]| -> String {
            let parts: Vec<String> = cells
                .iter()
                .zip(COLUMNS.iter().zip(&widths))
                .map(|(cell, (column, &width))| {
                    if column.numeric {
                        format!("{:>width$}", cell, width = width)
                    } else {
                        format!("{:<width$}", cell, width = width)
                    }
                })
                .collect();
            parts.join("  ").trim_end().to_string()
        };

        let mut out = String::new();
        out.push_str(&summary_line(view.tag.as_ref(), &view.summary));
        out.push_str("\n\n");
        out.push_str(&format_line(&headers));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &rows {
            out.push_str(&format_line(&row.cells));
            out.push('\n');
        }

        Ok(out)
    }
}

/// Pretty-printed JSON of the whole view.
pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn render(&self, view: &ResultView) -> Result<String, RenderError> {
        let mut out = serde_json::to_string_pretty(view)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortKey;
    use pretty_assertions::assert_eq;

    fn record() -> MemberRecord {
        MemberRecord {
            player_id: Some("#P2Q8".to_string()),
            player_name: Some("Ana".to_string()),
            town_hall: Some(14.0),
            cum_attacks_used: Some(3.0),
            cum_attacks_possible: Some(4.0),
            cum_destruction_pct: Some(250.0),
            last_updated: Some("2025-03-05T12:30:00Z".to_string()),
            attacks_left: Some(1.0),
            avg_destruction: Some(83.333),
            completion_pct: Some(75.0),
            recommendation_score: Some(75_083_347.0),
            recommendation_rank: Some(1),
            ..Default::default()
        }
    }

    fn view(records: Vec<MemberRecord>) -> ResultView {
        let summary = crate::calculate::summarize(&records);
        ResultView {
            tag: ClanTag::normalize("ABC"),
            sort: SortState::default(),
            summary,
            records,
        }
    }

    #[test]
    fn test_display_row_cells() {
        let row = DisplayRow::from_record(&record());

        assert_eq!(
            row.cells,
            vec!["#1", "Ana", "14", "4", "1 [warn]", "83", "Mar 05, 2025", "#P2Q8"]
        );
        assert_eq!(row.badge, Some(AttacksLeftBadge::Warn));
    }

    #[test]
    fn test_display_row_missing_values() {
        let row = DisplayRow::from_record(&MemberRecord::default());

        assert!(row.cells.iter().all(|c| c == "-"));
        assert_eq!(row.badge, None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2025-03-05T12:30:00Z")), "Mar 05, 2025");
        assert_eq!(format_date(Some("2025-03-05T12:30:00.123456")), "Mar 05, 2025");
        assert_eq!(format_date(Some("2025-03-05 08:00:00")), "Mar 05, 2025");
        assert_eq!(format_date(Some("2025-11-20")), "Nov 20, 2025");
        assert_eq!(format_date(Some("last tuesday")), "last tuesday");
        assert_eq!(format_date(Some("")), "-");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_summary_line() {
        let records = vec![record()];
        let summary = crate::calculate::summarize(&records);
        let tag = ClanTag::normalize("ABC");

        assert_eq!(
            summary_line(tag.as_ref(), &summary),
            "Showing 1 members for #ABC • Attacks used: 3 / 4 • Avg destruction per attack: 83%"
        );
    }

    #[test]
    fn test_table_empty() {
        let out = TablePresenter.render(&view(Vec::new())).unwrap();
        assert_eq!(out, "No results to display.\n");
    }

    #[test]
    fn test_table_marks_active_sort_column() {
        let out = TablePresenter.render(&view(vec![record()])).unwrap();
        let header = out.lines().nth(2).unwrap();

        assert!(header.starts_with("Rank ▼"));
        assert!(header.contains("Player ID"));
    }

    #[test]
    fn test_table_marks_ascending() {
        let mut v = view(vec![record()]);
        v.sort = SortState::new(SortKey::TownHall, SortDirection::Asc);

        let out = TablePresenter.render(&v).unwrap();
        assert!(out.contains("Town Hall ▲"));
        assert!(out.lines().nth(2).unwrap().starts_with("Rank "));
    }

    #[test]
    fn test_table_has_row_per_record() {
        let mut second = record();
        second.player_name = Some("Bo".to_string());
        second.recommendation_rank = Some(2);

        let out = TablePresenter.render(&view(vec![record(), second])).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        // summary, blank, header, rule, two rows
        assert_eq!(lines.len(), 6);
        assert!(lines[4].starts_with("#1"));
        assert!(lines[5].starts_with("#2"));
        assert!(lines[5].contains("Bo"));
    }

    #[test]
    fn test_json_presenter() {
        let out = JsonPresenter.render(&view(vec![record()])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["tag"], "#ABC");
        assert_eq!(value["sort"]["key"], "recommendationScore");
        assert_eq!(value["summary"]["members"], 1);
        assert_eq!(value["records"][0]["playerName"], "Ana");
        assert_eq!(value["records"][0]["recommendationRank"], 1);
    }

    #[test]
    fn test_presenters_end_with_single_newline() {
        for format in [OutputFormat::Table, OutputFormat::Json] {
            for records in [Vec::new(), vec![record()]] {
                let out = format.presenter().render(&view(records)).unwrap();
                assert!(out.ends_with('\n'), "{} output lacks newline", format);
                assert!(!out.ends_with("\n\n"), "{} output has blank tail", format);
            }
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "table");
    }
}
