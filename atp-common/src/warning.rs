//! Non-fatal diagnostics attached to a successful parse

use serde::Serialize;
use std::fmt;

use crate::day::Day;

/// An assumption or anomaly the parser had to work around.
///
/// Warnings never prevent a best-effort timetable from being returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No day header was found; columns were assigned Monday onwards
    MissingHeader,
    /// No day header was found; rows labelled with day names were read as days
    DaysAsRows,
    /// Rows above the day header were not part of the grid
    PreambleSkipped { rows: usize },
    /// One header cell carried several day names and was split
    MergedHeaderCell { cell: String, days: Vec<Day> },
    /// Data columns beyond the header (zero-based column indexes)
    ExtraColumnsIgnored { columns: Vec<usize> },
    /// Rows without a day label in a days-as-rows table
    UnlabelledRowsSkipped { rows: usize },
    /// Two cells claimed the same day/period; the first one kept the slot
    SlotConflict {
        day: Day,
        period: usize,
        kept: String,
        dropped: String,
    },
    /// A data cell held a day name and was read as a label, not a subject
    DayNameSkipped {
        day: Day,
        period: usize,
        cell: String,
    },
    /// Different spellings of one subject were counted together
    MergedSubjectVariants {
        subject: String,
        variants: Vec<String>,
    },
    /// OCR reported low confidence in the recognized text
    LowConfidence { confidence: f64, threshold: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingHeader => write!(
                f,
                "No day header found; columns were assumed to run Monday, Tuesday, ..."
            ),
            Warning::DaysAsRows => write!(
                f,
                "No day header found; rows starting with a day name were read as days"
            ),
            Warning::PreambleSkipped { rows } => {
                write!(f, "Skipped {} row(s) above the day header", rows)
            }
            Warning::MergedHeaderCell { cell, days } => {
                let names: Vec<String> = days.iter().map(Day::to_string).collect();
                write!(f, "Header cell '{}' was split into {}", cell, names.join(", "))
            }
            Warning::ExtraColumnsIgnored { columns } => {
                let cols: Vec<String> = columns.iter().map(|c| (c + 1).to_string()).collect();
                write!(
                    f,
                    "Column(s) {} have no day in the header and were ignored",
                    cols.join(", ")
                )
            }
            Warning::UnlabelledRowsSkipped { rows } => {
                write!(f, "Skipped {} row(s) without a day label", rows)
            }
            Warning::SlotConflict {
                day,
                period,
                kept,
                dropped,
            } => write!(
                f,
                "{} period {} is claimed by both '{}' and '{}'; kept '{}'",
                day,
                period + 1,
                kept,
                dropped,
                kept
            ),
            Warning::DayNameSkipped { day, period, cell } => write!(
                f,
                "{} period {} holds the day name '{}'; it was not counted as a subject",
                day,
                period + 1,
                cell
            ),
            Warning::MergedSubjectVariants { subject, variants } => write!(
                f,
                "Counted spellings {} together as '{}'",
                variants
                    .iter()
                    .map(|v| format!("'{}'", v))
                    .collect::<Vec<_>>()
                    .join(", "),
                subject
            ),
            Warning::LowConfidence {
                confidence,
                threshold,
            } => write!(
                f,
                "Text recognition confidence {:.1}% is below {:.1}%; check the timetable",
                confidence, threshold
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(Warning::PreambleSkipped { rows: 2 }).unwrap();
        assert_eq!(json["kind"], "preamble_skipped");
        assert_eq!(json["rows"], 2);

        let json = serde_json::to_value(Warning::MissingHeader).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "missing_header" }));
    }

    #[test]
    fn test_display_is_one_based() {
        let w = Warning::SlotConflict {
            day: Day::Mon,
            period: 0,
            kept: "Math".into(),
            dropped: "Phy".into(),
        };
        assert_eq!(
            w.to_string(),
            "Monday period 1 is claimed by both 'Math' and 'Phy'; kept 'Math'"
        );

        let w = Warning::ExtraColumnsIgnored { columns: vec![3, 4] };
        assert_eq!(
            w.to_string(),
            "Column(s) 4, 5 have no day in the header and were ignored"
        );

        let w = Warning::DayNameSkipped {
            day: Day::Tue,
            period: 1,
            cell: "Friday".into(),
        };
        assert_eq!(
            w.to_string(),
            "Tuesday period 2 holds the day name 'Friday'; it was not counted as a subject"
        );
    }
}
