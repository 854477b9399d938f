pub use error_location::ErrorLocation;

// -------------------------------------------------------------------------- //

use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid auth level: {value} {location}")]
    InvalidAuthLevel {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid record reference: {value} {location}")]
    InvalidThing {
        value: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
