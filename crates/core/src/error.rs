use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building or running the generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Configuration that cannot produce a dataset at all.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sale refers to a product missing from the catalog.
    #[error("unknown product id: {0}")]
    UnknownProduct(u32),

    /// Per-product dates must be strictly increasing for cumulative stock.
    #[error("sales for product {product_id} are not in increasing date order at {date}")]
    OutOfOrder { product_id: u32, date: NaiveDate },

    /// A sampling distribution could not be constructed.
    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type SynthResult<T> = Result<T, SynthError>;
