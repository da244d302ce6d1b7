//! Weekday model and day-name recognition

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week a timetable column (or row) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Shortest full-name length that gets fuzzy matching ("monday", "friday", ...)
const FUZZY_MIN_LEN: usize = 6;

impl Day {
    /// All days, Monday first
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    /// Day for a zero-based column index, wrapping weekly from Monday
    pub fn cyclic(index: usize) -> Day {
        Day::ALL[index % Day::ALL.len()]
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Day::Mon => "monday",
            Day::Tue => "tuesday",
            Day::Wed => "wednesday",
            Day::Thu => "thursday",
            Day::Fri => "friday",
            Day::Sat => "saturday",
            Day::Sun => "sunday",
        }
    }

    fn abbreviations(self) -> &'static [&'static str] {
        match self {
            Day::Mon => &["mon"],
            Day::Tue => &["tue", "tues"],
            Day::Wed => &["wed", "weds"],
            Day::Thu => &["thu", "thur", "thurs"],
            Day::Fri => &["fri"],
            Day::Sat => &["sat"],
            Day::Sun => &["sun"],
        }
    }

    /// Parse a single token as a day name.
    ///
    /// Case-insensitive; accepts full names, common abbreviations and an
    /// optional trailing period. Full names survive one OCR character error.
    ///
    /// ```
    /// use atp_common::day::Day;
    ///
    /// assert_eq!(Day::parse_token("Wed."), Some(Day::Wed));
    /// assert_eq!(Day::parse_token("THURSDAY"), Some(Day::Thu));
    /// assert_eq!(Day::parse_token("Fridav"), Some(Day::Fri));
    /// assert_eq!(Day::parse_token("Math"), None);
    /// ```
    pub fn parse_token(token: &str) -> Option<Day> {
        Day::match_token(token, true)
    }

    /// Like [`Day::parse_token`] but without OCR error tolerance.
    ///
    /// ```
    /// use atp_common::day::Day;
    ///
    /// assert_eq!(Day::parse_token_exact("Fri."), Some(Day::Fri));
    /// assert_eq!(Day::parse_token_exact("Sundry"), None);
    /// ```
    pub fn parse_token_exact(token: &str) -> Option<Day> {
        Day::match_token(token, false)
    }

    fn match_token(token: &str, fuzzy: bool) -> Option<Day> {
        let token = token.trim().trim_end_matches('.').to_lowercase();
        if token.is_empty() {
            return None;
        }

        for day in Day::ALL {
            if token == day.full_name() || day.abbreviations().contains(&token.as_str()) {
                return Some(day);
            }
        }

        if fuzzy && token.chars().count() >= FUZZY_MIN_LEN {
            return Day::ALL
                .into_iter()
                .find(|day| strsim::levenshtein(&token, day.full_name()) <= 1);
        }

        None
    }

    /// Parse a whole cell as one or more day names.
    ///
    /// Returns the days in order when every whitespace-separated token is a
    /// day ("Tuesday Wednesday" is a merged header cell), otherwise empty.
    pub fn parse_cell(cell: &str) -> Vec<Day> {
        Day::parse_cell_with(cell, Day::parse_token)
    }

    /// Cell parsing without fuzzy matching, for cells that may be subjects
    pub fn parse_cell_exact(cell: &str) -> Vec<Day> {
        Day::parse_cell_with(cell, Day::parse_token_exact)
    }

    fn parse_cell_with(cell: &str, parse: fn(&str) -> Option<Day>) -> Vec<Day> {
        let mut days = Vec::new();
        for token in cell.split_whitespace() {
            match parse(token) {
                Some(day) => days.push(day),
                None => return Vec::new(),
            }
        }
        days
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.full_name();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}
