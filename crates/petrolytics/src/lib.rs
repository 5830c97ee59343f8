//! Core building blocks for the Petrolytics analytics dashboard.
//!
//! The crate covers the full reporting path: loading uploaded tabular data
//! into [`model::Dataset`] values, computing per-column top-5 summaries
//! ([`summary`]), rasterizing line/bar/area charts to PNG buffers
//! ([`chart`]), and assembling everything into a single paginated PDF
//! ([`report`]).  Session-scoped accumulation of datasets and chart
//! artifacts lives in [`session`].
//!
//! The relay endpoint that backs the chat assistant is a separate binary
//! crate (`petrolytics-server`) and shares no state with this one.

pub mod chart;
pub mod load;
pub mod model;
pub mod report;
pub mod session;
pub mod summary;
