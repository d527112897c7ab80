//! HTTP handler functions, grouped by resource.

pub mod analysis;
pub mod breakpoints;
pub mod stats;
pub mod traces;
pub mod visualization;
pub mod watches;
