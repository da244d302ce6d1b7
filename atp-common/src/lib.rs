//! # ATP Common Library
//!
//! Core of the attendance timetable planner:
//! - Token normalization of recognized text
//! - Timetable reconstruction (day × period grid → weekly counts)
//! - Attendance feasibility planning
//! - API request/response types
//! - Configuration loading
//!
//! Every core operation is a pure function over immutable inputs; the data
//! flows one way: text → [`normalize()`] → [`reconstruct()`] → [`plan()`].

pub mod api;
pub mod config;
pub mod day;
pub mod error;
pub mod normalize;
pub mod planner;
pub mod recognized;
pub mod reconstruct;
pub mod timetable;
pub mod warning;

pub use day::Day;
pub use error::{Error, Result};
pub use normalize::{normalize, RawRow};
pub use planner::{plan, AttendanceSnapshot, SubjectPlan, Verdict};
pub use recognized::{parse_recognized, RecognizedText};
pub use reconstruct::{reconstruct, reconstruct_with, ReconstructOptions, Reconstruction};
pub use timetable::{Timetable, TimetableEntry};
pub use warning::Warning;
