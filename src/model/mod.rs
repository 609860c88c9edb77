mod caregiver;
mod shift;

pub use caregiver::Caregiver;
pub use shift::Shift;

use crate::persistence::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid shift date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("unknown shift type '{0}'")]
    UnknownShiftType(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
