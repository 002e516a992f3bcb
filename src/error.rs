//! Error types for breakpoint lookups and listener binding.

use thiserror::Error;

/// Errors reported by the breakpoint helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// A breakpoint name was looked up that the effective set does not contain.
    #[error("unknown breakpoint `{0}`")]
    UnknownBreakpoint(String),

    /// A textual override could not be parsed.
    #[error("invalid breakpoint override `{0}` (expected `name=width`)")]
    InvalidOverride(String),

    /// A listener or derived signal was requested outside of any reactive scope.
    #[error("no active scope for `{0}`")]
    NoActiveScope(String),

    /// No [`Window`](crate::window::Window) was provided to the current scope.
    #[error("no window provided in the current scope")]
    MissingWindow,

    /// Reading the terminal or its event stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
