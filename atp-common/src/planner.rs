//! Attendance planner
//!
//! Computes, per subject, how many of the remaining lectures may be missed or
//! must be attended to reach the target percentage.
//!
//! # Aggregate attendance assumption
//!
//! The snapshot carries one overall percentage and one total of lectures
//! held, not per-subject attendance. Every subject is therefore evaluated
//! against the same aggregate baseline ([`Baseline`]). This is a domain
//! simplification, not a per-subject audit: a student far behind in one
//! subject and ahead in another sees identical baselines for both. A future
//! per-subject input only needs to supply a different `Baseline` per subject.
//!
//! # Rounding
//!
//! Allowed misses round down and required attendance rounds up, so a bound
//! never promises more slack than is mathematically guaranteed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timetable::Timetable;
use crate::{Error, Result};

/// Absorbs float representation error before floor/ceil
const EPSILON: f64 = 1e-9;

/// Current attendance and goal, as supplied per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSnapshot {
    /// Overall attendance so far, in [0, 100]
    pub overall_percent: f64,
    /// Lectures held so far
    #[serde(alias = "totalLectures")]
    pub total_lectures_held: i64,
    /// Target attendance, in [0, 100]
    pub target_percent: f64,
    /// Whole weeks left in the term
    pub remaining_weeks: i64,
}

impl AttendanceSnapshot {
    /// Check every field's range, naming the first offending field
    pub fn validate(&self) -> Result<()> {
        check_percent("overallPercent", self.overall_percent)?;
        check_percent("targetPercent", self.target_percent)?;
        check_count("totalLecturesHeld", self.total_lectures_held)?;
        check_count("remainingWeeks", self.remaining_weeks)?;
        Ok(())
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidSnapshot {
            field,
            reason: format!("must be within [0, 100], got {}", value),
        })
    }
}

fn check_count(field: &'static str, value: i64) -> Result<()> {
    if value >= 0 {
        Ok(())
    } else {
        Err(Error::InvalidSnapshot {
            field,
            reason: format!("must not be negative, got {}", value),
        })
    }
}

/// Lectures held and attended that a subject is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub held: u64,
    pub attended: u64,
}

impl Baseline {
    /// Shared baseline derived from the aggregate snapshot
    pub fn aggregate(snapshot: &AttendanceSnapshot) -> Self {
        let held = snapshot.total_lectures_held.max(0) as u64;
        let attended = (snapshot.overall_percent / 100.0 * held as f64).round() as u64;
        Self {
            held,
            attended: attended.min(held),
        }
    }
}

/// Feasibility outcome for one subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Verdict {
    /// Up to this many of the remaining lectures may be missed
    CanMiss(u64),
    /// Every remaining lecture must be attended
    MustAttendAll,
    /// At least this many remaining lectures must be attended
    MustAttendAtLeast(u64),
    /// The target cannot be reached even with perfect attendance
    AlreadyBelowReachable,
    /// A zero target is met whatever happens
    TargetTriviallyMet,
}

/// Plan for a single subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPlan {
    pub subject: String,
    pub weekly_sessions: u32,
    pub remaining_sessions: u64,
    pub verdict: Verdict,
    /// Allowed misses for `CanMiss`/`TargetTriviallyMet`, otherwise the
    /// number of lectures that must be attended
    pub bound: u64,
}

impl SubjectPlan {
    /// One-line summary for display
    pub fn message(&self) -> String {
        let remaining = self.remaining_sessions;
        match self.verdict {
            Verdict::TargetTriviallyMet => format!(
                "No attendance target; all {} remaining lectures can be missed.",
                remaining
            ),
            Verdict::CanMiss(_) if remaining == 0 => {
                "No lectures remain; the target is already met.".to_string()
            }
            Verdict::CanMiss(0) => {
                "Exactly on target; missing any lecture drops you below it.".to_string()
            }
            Verdict::CanMiss(n) if n == remaining => format!(
                "You can miss all {} remaining lectures and still meet the target.",
                remaining
            ),
            Verdict::CanMiss(n) => format!(
                "You can miss up to {} of the next {} lectures.",
                n, remaining
            ),
            Verdict::MustAttendAll => "Attend every remaining lecture.".to_string(),
            Verdict::MustAttendAtLeast(n) => format!(
                "Attend at least {} of the next {} lectures.",
                n, remaining
            ),
            Verdict::AlreadyBelowReachable => {
                "Not possible to reach target attendance.".to_string()
            }
        }
    }
}

/// Plan every subject in the timetable against the snapshot.
///
/// Plans come back in timetable order. An empty timetable yields an empty
/// plan; an invalid snapshot fails even then.
pub fn plan(snapshot: &AttendanceSnapshot, timetable: &Timetable) -> Result<Vec<SubjectPlan>> {
    snapshot.validate()?;

    let baseline = Baseline::aggregate(snapshot);
    let weeks = snapshot.remaining_weeks as u64;
    debug!(
        "Planning {} subjects: held={} attended={} target={} weeks={}",
        timetable.len(),
        baseline.held,
        baseline.attended,
        snapshot.target_percent,
        weeks
    );

    Ok(timetable
        .iter()
        .map(|(subject, weekly)| {
            let remaining = u64::from(weekly).saturating_mul(weeks);
            let (verdict, bound) = evaluate(baseline, snapshot.target_percent, remaining);
            SubjectPlan {
                subject: subject.to_string(),
                weekly_sessions: weekly,
                remaining_sessions: remaining,
                verdict,
                bound,
            }
        })
        .collect())
}

/// Verdict and bound for one subject with `remaining` lectures left
pub fn evaluate(baseline: Baseline, target_percent: f64, remaining: u64) -> (Verdict, u64) {
    if target_percent == 0.0 {
        return (Verdict::TargetTriviallyMet, remaining);
    }
    if target_percent == 100.0 {
        // One missed lecture makes 100% unreachable for good
        return if baseline.attended == baseline.held {
            (Verdict::MustAttendAll, remaining)
        } else {
            (Verdict::AlreadyBelowReachable, 0)
        };
    }

    let held = baseline.held as f64;
    let attended = baseline.attended as f64;

    let max_missable =
        (attended * 100.0 / target_percent + EPSILON).floor() as i64 - baseline.held as i64;
    if max_missable > 0 {
        let allowed = (max_missable as u64).min(remaining);
        return (Verdict::CanMiss(allowed), allowed);
    }

    let must_attend = ((target_percent * held - 100.0 * attended) / (100.0 - target_percent)
        - EPSILON)
        .ceil()
        .max(0.0) as u64;

    if must_attend > remaining {
        (Verdict::AlreadyBelowReachable, must_attend)
    } else if must_attend == 0 {
        (Verdict::CanMiss(0), 0)
    } else if must_attend == remaining {
        (Verdict::MustAttendAll, remaining)
    } else {
        (Verdict::MustAttendAtLeast(must_attend), must_attend)
    }
}
