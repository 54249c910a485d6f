/// Message shown to the user for any failed calculation, whatever the cause.
pub const GENERIC_ERROR_MESSAGE: &str = "Error calculating gain. Please check your input.";

/// Trade input rejected before it reaches the calculator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative: {value}")]
    Negative { field: &'static str, value: String },
    #[error("{0} must be at least 1")]
    ZeroQuantity(&'static str),
    #[error("cannot sell {sold} shares out of {bought} bought")]
    SoldExceedsBought { sold: u64, bought: u64 },
    #[error("malformed trade record: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GainError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("computation failed: {0}")]
    Computation(String),
}
