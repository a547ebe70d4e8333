//! Error types for Weft.

use core::fmt;

/// Result type alias for Weft operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for list and binding operations.
///
/// Most of the reactive core cannot fail; these variants cover the checked
/// entry points that validate caller input instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An index was outside `0..len` (or `0..=len` for insertion).
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    /// A move referenced a position outside the list.
    InvalidMove {
        from: usize,
        to: usize,
        len: usize,
    },
    /// A rendered node is no longer attached to its container.
    Detached,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for length {}", index, len)
            }
            Error::InvalidMove { from, to, len } => {
                write!(f, "Invalid move from {} to {} for length {}", from, to, len)
            }
            Error::Detached => write!(f, "Node is not attached to its container"),
        }
    }
}

impl Error {
    /// Creates an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Error::IndexOutOfBounds { index, len }
    }

    /// Creates an invalid move error.
    pub fn invalid_move(from: usize, to: usize, len: usize) -> Self {
        Error::InvalidMove { from, to, len }
    }
}
