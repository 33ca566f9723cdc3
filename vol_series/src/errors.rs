use thiserror::Error;

use crate::providers::errors::ProviderError;

/// The unified error type for the `vol_series` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied records are not indexed by calendar timestamps.
    #[error("Series must be indexed by timestamps: {0}")]
    InvalidIndex(String),

    /// An argument was outside the set of recognized values.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An error originating from the market data provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
