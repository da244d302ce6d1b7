//! API module for shared HTTP API types
//!
//! # Design Principle
//!
//! This module contains ONLY serde value objects (no HTTP framework
//! dependencies). The coordinator wraps them with framework-specific
//! handlers (Axum).

pub mod types;

pub use types::{
    CalculateRequest, CalculateResponse, ErrorResponse, ParseTableResponse, PlanRequest,
    PlanResponse, PlanResult, SnapshotFields, WarningView,
};
