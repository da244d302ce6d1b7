//! Token normalizer
//!
//! Turns raw recognized text into candidate table rows. The dominant cell
//! delimiter is chosen by majority vote across lines, so a photo of a
//! pipe-ruled table and a tab-separated paste both come out as rows of cells.
//! Lines that do not carry the dominant delimiter degrade to single-cell rows.

use tracing::debug;

use crate::{Error, Result};

/// One physical table row as recognized, before any semantic interpretation
pub type RawRow = Vec<String>;

/// Characters OCR tends to scatter around cell text
const STRAY_PUNCTUATION: &[char] = &['.', ',', ';', ':', '\'', '"', '`'];

/// Candidate cell delimiters, in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Pipe,
    /// Two or more consecutive spaces
    Spaces,
}

impl Delimiter {
    const CANDIDATES: [Delimiter; 3] = [Delimiter::Tab, Delimiter::Pipe, Delimiter::Spaces];

    fn occurs_in(self, line: &str) -> bool {
        match self {
            Delimiter::Tab => line.contains('\t'),
            Delimiter::Pipe => line.contains('|'),
            Delimiter::Spaces => line.contains("  "),
        }
    }

    /// Split a trimmed line; runs of the delimiter collapse into one.
    fn split(self, line: &str) -> Vec<&str> {
        match self {
            Delimiter::Tab => collapse(line.split('\t')),
            Delimiter::Pipe => collapse(line.split('|')),
            Delimiter::Spaces => split_on_space_runs(line),
        }
    }
}

fn collapse<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    // Adjacent delimiters yield exactly-empty pieces; whitespace-only pieces
    // are genuine empty cells and keep their column.
    pieces.filter(|p| !p.is_empty()).collect()
}

fn split_on_space_runs(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b' ' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            if i - run_start >= 2 {
                cells.push(&line[start..run_start]);
                start = i;
            }
        } else {
            i += 1;
        }
    }
    cells.push(&line[start..]);
    cells
}

/// Pick the delimiter present on the most lines, or `None` if no line has any.
pub fn detect_delimiter<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<Delimiter> {
    let mut votes = [0usize; 3];
    for line in lines {
        for (slot, delimiter) in Delimiter::CANDIDATES.iter().enumerate() {
            if delimiter.occurs_in(line) {
                votes[slot] += 1;
            }
        }
    }

    let mut best: Option<(Delimiter, usize)> = None;
    for (slot, delimiter) in Delimiter::CANDIDATES.iter().enumerate() {
        let count = votes[slot];
        // Strictly greater keeps the earlier candidate on ties
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((*delimiter, count));
        }
    }
    best.map(|(delimiter, _)| delimiter)
}

/// Trim whitespace and stray OCR punctuation from a cell.
pub fn clean_cell(cell: &str) -> String {
    cell.trim_matches(|c: char| c.is_whitespace() || STRAY_PUNCTUATION.contains(&c))
        .to_string()
}

/// Normalize raw recognized text into rows of cleaned cells.
///
/// Pure and deterministic. Fails only when nothing but whitespace and stray
/// punctuation remains.
pub fn normalize(raw_text: &str) -> Result<Vec<RawRow>> {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let delimiter = detect_delimiter(lines.iter().copied());
    debug!("Detected delimiter {:?} across {} lines", delimiter, lines.len());

    let rows: Vec<RawRow> = lines
        .iter()
        .map(|line| split_line(line, delimiter))
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    if rows.is_empty() {
        return Err(Error::EmptyInput(
            "no non-empty rows after normalization".to_string(),
        ));
    }

    Ok(rows)
}

fn split_line(line: &str, delimiter: Option<Delimiter>) -> RawRow {
    let pieces = match delimiter {
        Some(d) if d.occurs_in(line) => d.split(line),
        _ => vec![line],
    };

    let mut cells: RawRow = pieces.into_iter().map(clean_cell).collect();

    // Edge delimiters ("| a | b |") leave empty cells with no column behind them
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    let leading = cells.iter().take_while(|c| c.is_empty()).count();
    cells.drain(..leading);

    cells
}
