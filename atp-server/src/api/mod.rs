//! HTTP API handlers for atp-server

pub mod buildinfo;
pub mod calculate;
pub mod error;
pub mod health;
pub mod parse;
pub mod plan;

pub use buildinfo::get_build_info;
pub use calculate::calculate;
pub use error::ApiError;
pub use health::health_routes;
pub use parse::parse_table;
pub use plan::plan_from_text;
