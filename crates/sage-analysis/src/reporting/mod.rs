//! Report assembly stage.
//!
//! Renders the profiling, chart and insight artifacts into a markdown
//! document (always) and an HTML wrapper of the same content (on request).

mod generator;

pub use generator::ReportGenerator;
