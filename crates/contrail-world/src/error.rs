//! Error types for the `contrail-world` crate.

use contrail_types::AirportId;

/// Errors raised by the reference data collaborators.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An airport was not found in the directory.
    #[error("airport not found: {0}")]
    AirportNotFound(AirportId),

    /// Two airports share a location code.
    #[error("duplicate airport code: {0}")]
    DuplicateAirportCode(String),

    /// A path was requested between an airport and itself.
    #[error("cannot plot a path from {0} to itself")]
    DegenerateRoute(AirportId),
}
