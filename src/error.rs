use thiserror::Error;

/// Errors returned by the positional operations of a `LinkedList`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The index does not address a valid position for the operation.
    #[error("index {index} out of bounds for list of size {size}")]
    OutOfBounds { index: usize, size: usize },
}
