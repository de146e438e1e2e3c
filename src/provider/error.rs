//! Provider error types.

use crate::core::ActionError;
use crate::persistence::PersistenceError;
use thiserror::Error;

/// Errors surfaced by provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Untyped action could not be interpreted
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Snapshot could not be restored or saved
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Context lookup failed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("CitiesContext was used outside the CitiesProvider")]
    OutsideProvider,
}
