//! Build errors for machine construction.

use thiserror::Error;

/// Errors that can occur when constructing a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("The initial state '{state}' must exist in the state table")]
    UnknownInitialState { state: String },
}
