//! Table reconstructor
//!
//! Maps normalized rows onto a day × period grid and counts weekly sessions
//! per subject. Reconstruction is best-effort: every assumption made about an
//! ambiguous layout is reported as a [`Warning`], and the only hard failure is
//! a table in which no subject cell could be placed at all.
//!
//! Layouts are tried in order:
//! 1. a header row of day names (columns are days, rows are periods),
//! 2. rows labelled with day names (rows are days, columns are periods),
//! 3. a lone day name heading a single-column table,
//! 4. cyclic fallback (column *i* is day `i mod 7` starting Monday).

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::day::Day;
use crate::normalize::RawRow;
use crate::timetable::{normalize_subject, Timetable, TimetableEntry};
use crate::warning::Warning;
use crate::{Error, Result};

/// Cells that mark a slot without a class
pub const DEFAULT_STOPWORDS: &[&str] = &["lunch", "break", "-", "free"];

/// Tunables for [`reconstruct_with`]
#[derive(Debug, Clone, Default)]
pub struct ReconstructOptions {
    /// Additional non-subject tokens, matched after subject normalization
    pub extra_stopwords: Vec<String>,
}

impl ReconstructOptions {
    pub fn with_extra_stopwords<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            extra_stopwords: words
                .into_iter()
                .map(|w| normalize_subject(w.as_ref()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    fn is_stopword(&self, key: &str) -> bool {
        DEFAULT_STOPWORDS.contains(&key)
            || key.chars().all(|c| matches!(c, '-' | '–' | '—' | '_' | '='))
            || self
                .extra_stopwords
                .iter()
                .any(|w| normalize_subject(w) == key)
    }
}

/// Outcome of a successful reconstruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconstruction {
    pub timetable: Timetable,
    /// Placed entries, in reading order
    pub entries: Vec<TimetableEntry>,
    pub warnings: Vec<Warning>,
}

/// Reconstruct with the default stoplist
pub fn reconstruct(rows: &[RawRow]) -> Result<Reconstruction> {
    reconstruct_with(rows, &ReconstructOptions::default())
}

/// Reconstruct a weekly timetable from normalized rows.
pub fn reconstruct_with(rows: &[RawRow], options: &ReconstructOptions) -> Result<Reconstruction> {
    let shapes: Vec<RowShape> = rows.iter().map(|row| classify(row)).collect();
    let mut grid = Grid::new(options);

    if let Some(header_at) = shapes.iter().position(|s| *s == RowShape::Header) {
        read_header_layout(rows, header_at, &mut grid);
    } else if is_days_as_rows(rows, &shapes) {
        read_days_as_rows(rows, &shapes, &mut grid);
    } else if let Some(header_at) = rows.iter().position(is_all_days) {
        // Single-column table headed by one day name
        read_header_layout(rows, header_at, &mut grid);
    } else {
        read_cyclic(rows, &mut grid);
    }

    grid.finish(rows.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowShape {
    /// No day names at all
    Plain,
    /// First cell is a single day name and no other cell is a day
    DayLabelled { day: Day, at: usize },
    /// Several day names, or day names after a non-day label
    Header,
}

fn classify(row: &RawRow) -> RowShape {
    let parsed: Vec<Vec<Day>> = row.iter().map(|cell| Day::parse_cell(cell)).collect();
    let day_cells = parsed.iter().filter(|days| !days.is_empty()).count();
    if day_cells == 0 {
        return RowShape::Plain;
    }

    if let Some(first) = row.iter().position(|cell| !cell.is_empty()) {
        if day_cells == 1 && parsed[first].len() == 1 {
            return RowShape::DayLabelled {
                day: parsed[first][0],
                at: first,
            };
        }
    }
    RowShape::Header
}

fn is_all_days(row: &RawRow) -> bool {
    let mut cells = row.iter().filter(|cell| !cell.is_empty()).peekable();
    cells.peek().is_some() && cells.all(|cell| !Day::parse_cell(cell).is_empty())
}

/// At least half the rows are day-labelled and some label carries cells
fn is_days_as_rows(rows: &[RawRow], shapes: &[RowShape]) -> bool {
    let mut labelled = 0;
    let mut carrying = 0;
    for (row, shape) in rows.iter().zip(shapes) {
        if let RowShape::DayLabelled { at, .. } = *shape {
            labelled += 1;
            if row[at + 1..].iter().any(|cell| !cell.is_empty()) {
                carrying += 1;
            }
        }
    }
    carrying > 0 && labelled * 2 >= shapes.len()
}

fn read_header_layout(rows: &[RawRow], header_at: usize, grid: &mut Grid<'_>) {
    if header_at > 0 {
        grid.warn(Warning::PreambleSkipped { rows: header_at });
    }

    let mut columns: Vec<Option<Day>> = Vec::new();
    push_header_cells(&rows[header_at], &mut columns, grid);

    // OCR often wraps trailing day names onto their own line
    let mut data_start = header_at + 1;
    while data_start < rows.len() && is_all_days(&rows[data_start]) {
        let continuation: Vec<&String> = rows[data_start].iter().filter(|c| !c.is_empty()).collect();
        for cell in continuation {
            push_header_cell(cell, &mut columns, grid);
        }
        data_start += 1;
    }
    debug!(
        "Header at row {} maps {} columns: {:?}",
        header_at,
        columns.len(),
        columns
    );

    let mut ignored = BTreeSet::new();
    for (period, row) in rows[data_start..].iter().enumerate() {
        for (column, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match columns.get(column) {
                Some(Some(day)) => grid.place(*day, period, cell),
                Some(None) => debug!("Label column {} cell {:?} skipped", column, cell),
                None => {
                    ignored.insert(column);
                }
            }
        }
    }

    if !ignored.is_empty() {
        grid.warn(Warning::ExtraColumnsIgnored {
            columns: ignored.into_iter().collect(),
        });
    }
}

fn push_header_cells(row: &RawRow, columns: &mut Vec<Option<Day>>, grid: &mut Grid<'_>) {
    for cell in row {
        push_header_cell(cell, columns, grid);
    }
}

fn push_header_cell(cell: &str, columns: &mut Vec<Option<Day>>, grid: &mut Grid<'_>) {
    let days = Day::parse_cell(cell);
    match days.len() {
        // Empty or a label such as "Time" / "Period"
        0 => columns.push(None),
        1 => columns.push(Some(days[0])),
        _ => {
            columns.extend(days.iter().copied().map(Some));
            grid.warn(Warning::MergedHeaderCell {
                cell: cell.to_string(),
                days,
            });
        }
    }
}

fn read_days_as_rows(rows: &[RawRow], shapes: &[RowShape], grid: &mut Grid<'_>) {
    grid.warn(Warning::DaysAsRows);

    let mut unlabelled = 0;
    for (row, shape) in rows.iter().zip(shapes) {
        let RowShape::DayLabelled { day, at } = *shape else {
            unlabelled += 1;
            continue;
        };
        for (period, cell) in row[at + 1..].iter().enumerate() {
            if !cell.is_empty() {
                grid.place(day, period, cell);
            }
        }
    }

    if unlabelled > 0 {
        grid.warn(Warning::UnlabelledRowsSkipped { rows: unlabelled });
    }
}

fn read_cyclic(rows: &[RawRow], grid: &mut Grid<'_>) {
    grid.warn(Warning::MissingHeader);

    for (period, row) in rows.iter().enumerate() {
        for (column, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                grid.place(Day::cyclic(column), period, cell);
            }
        }
    }
}

/// Accumulates entries while enforcing one subject per slot
struct Grid<'o> {
    options: &'o ReconstructOptions,
    entries: Vec<TimetableEntry>,
    slots: BTreeMap<(Day, usize), usize>,
    warnings: Vec<Warning>,
}

impl<'o> Grid<'o> {
    fn new(options: &'o ReconstructOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
            slots: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: Warning) {
        debug!("Reconstruction warning: {}", warning);
        self.warnings.push(warning);
    }

    fn place(&mut self, day: Day, period: usize, cell: &str) {
        let key = normalize_subject(cell);
        if key.is_empty() {
            return;
        }
        if self.options.is_stopword(&key) {
            debug!("{} period {}: skipping filler {:?}", day, period, cell);
            return;
        }
        // Exact names only: near misses such as "Sundry" stay subjects
        if !Day::parse_cell_exact(cell).is_empty() {
            self.warn(Warning::DayNameSkipped {
                day,
                period,
                cell: cell.to_string(),
            });
            return;
        }

        let subject = cell.trim();
        if let Some(&kept) = self.slots.get(&(day, period)) {
            let kept = self.entries[kept].subject.clone();
            self.warn(Warning::SlotConflict {
                day,
                period,
                kept,
                dropped: subject.to_string(),
            });
            return;
        }

        self.slots.insert((day, period), self.entries.len());
        self.entries.push(TimetableEntry::new(day, period, subject));
    }

    fn finish(mut self, row_count: usize) -> Result<Reconstruction> {
        if self.entries.is_empty() {
            return Err(Error::NoEntriesFound(format!(
                "no subject cells recognized in {} row(s)",
                row_count
            )));
        }

        let mut spellings: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        for entry in &self.entries {
            spellings
                .entry(entry.subject_key())
                .or_default()
                .insert(entry.subject.as_str());
        }
        let merged: Vec<Warning> = spellings
            .into_iter()
            .filter(|(_, variants)| variants.len() > 1)
            .map(|(subject, variants)| Warning::MergedSubjectVariants {
                subject,
                variants: variants.into_iter().map(str::to_string).collect(),
            })
            .collect();
        for warning in merged {
            self.warn(warning);
        }

        let timetable = Timetable::from_entries(&self.entries);
        debug!(
            "Reconstructed {} entries into {} subjects with {} warning(s)",
            self.entries.len(),
            timetable.len(),
            self.warnings.len()
        );

        Ok(Reconstruction {
            timetable,
            entries: self.entries,
            warnings: self.warnings,
        })
    }
}
