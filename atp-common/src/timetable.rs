//! Timetable model: slot entries and the derived subject → weekly count map

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::day::Day;

/// Canonical subject key: trimmed, case-folded, inner whitespace collapsed.
///
/// ```
/// use atp_common::timetable::normalize_subject;
///
/// assert_eq!(normalize_subject("  Linear   ALGEBRA "), "linear algebra");
/// ```
pub fn normalize_subject(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A subject attributed to one day/period slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub day: Day,
    /// Zero-based period within the day
    pub period: usize,
    /// Subject as it appeared in the cell (trimmed)
    pub subject: String,
}

impl TimetableEntry {
    pub fn new(day: Day, period: usize, subject: impl Into<String>) -> Self {
        Self {
            day,
            period,
            subject: subject.into(),
        }
    }

    /// Normalized subject key for this entry
    pub fn subject_key(&self) -> String {
        normalize_subject(&self.subject)
    }
}

/// Weekly session count per normalized subject name
///
/// Every count is at least one. Iteration and serialization are ordered by
/// subject name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timetable {
    subjects: BTreeMap<String, u32>,
}

impl Timetable {
    /// Count entries per normalized subject
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a TimetableEntry>) -> Self {
        let mut subjects = BTreeMap::new();
        for entry in entries {
            let key = entry.subject_key();
            if key.is_empty() {
                continue;
            }
            *subjects.entry(key).or_insert(0) += 1;
        }
        Self { subjects }
    }

    /// Build from caller-supplied counts (e.g. a timetable edited in the UI).
    ///
    /// Names are normalized and variants merged by summing (saturating at
    /// `u32::MAX`); zero counts and blank names are dropped.
    pub fn from_counts<S: AsRef<str>>(counts: impl IntoIterator<Item = (S, u32)>) -> Self {
        let mut subjects = BTreeMap::new();
        for (name, count) in counts {
            let key = normalize_subject(name.as_ref());
            if key.is_empty() || count == 0 {
                debug!("Dropping timetable row {:?} -> {}", name.as_ref(), count);
                continue;
            }
            let total = subjects.entry(key).or_insert(0u32);
            *total = total.saturating_add(count);
        }
        Self { subjects }
    }

    /// Weekly sessions for a subject, looked up by any spelling
    pub fn weekly_sessions(&self, subject: &str) -> Option<u32> {
        self.subjects.get(&normalize_subject(subject)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.subjects.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Sum of weekly sessions across all subjects
    pub fn total_weekly_sessions(&self) -> u64 {
        self.subjects.values().map(|&c| u64::from(c)).sum()
    }
}
