//! Core types for the Vahan registration-trends dashboard.
//!
//! Holds the record and series models, the error type, calendar helpers,
//! growth arithmetic, display formatting and CLI settings shared by the data
//! and binary crates.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, VahanError};
