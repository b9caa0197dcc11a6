//! Data layer for the Vahan registration-trends dashboard.
//!
//! Loads registration snapshots, normalises dates to month starts, applies
//! filters, aggregates monthly series by category and manufacturer, computes
//! YoY / QoQ growth and extracts latest-period summaries.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod growth;
pub mod ingestion;
pub mod normalizer;
pub mod reader;
pub mod summary;

pub use vahan_core as core;
