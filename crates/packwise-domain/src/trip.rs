//! Trip request validation

use thiserror::Error;

/// Minimum destination length, in characters
pub const MIN_DESTINATION_CHARS: usize = 2;

/// Maximum destination length, in characters
pub const MAX_DESTINATION_CHARS: usize = 50;

/// Errors raised while building domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Destination length is outside the accepted range
    #[error("destination must be 2-50 characters, got {0}")]
    InvalidDestination(usize),

    /// Trip length must be at least one day
    #[error("num_day must be greater than 0, got {0}")]
    InvalidDays(i64),
}

/// A single packing-list request
///
/// Lengths are counted in characters, not bytes, so a destination such as
/// `ハワイ` counts as three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    destination: String,
    days: u32,
}

impl TripRequest {
    /// Validate and build a request
    ///
    /// # Errors
    /// Returns [`DomainError`] if the trimmed destination is not 2-50
    /// characters long or `days` is not positive.
    pub fn new(destination: impl AsRef<str>, days: i64) -> Result<Self, DomainError> {
        let destination = destination.as_ref().trim();
        let chars = destination.chars().count();
        if !(MIN_DESTINATION_CHARS..=MAX_DESTINATION_CHARS).contains(&chars) {
            return Err(DomainError::InvalidDestination(chars));
        }

        let days = u32::try_from(days)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(DomainError::InvalidDays(days))?;

        Ok(Self {
            destination: destination.to_string(),
            days,
        })
    }

    /// Destination as supplied by the caller (trimmed)
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Trip length in days
    pub fn days(&self) -> u32 {
        self.days
    }
}
