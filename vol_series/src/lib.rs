//! Analytics for volatility time series: alignment and dependence statistics
//! between two date-indexed series, calendar resampling, VIX index fetching,
//! and futures term-structure classification.

pub mod errors;
pub mod models;
pub mod providers;
pub mod stats;
pub mod vix;

pub use errors::Error;
pub use models::series::TimeSeries;
pub use models::term_structure::{TermStructure, TermStructureShape};
