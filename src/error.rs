use std::path::PathBuf;

use thiserror::Error;

use crate::fragment::FragmentKind;
use crate::review::ReviewError;

/// Result type for javaparse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures outside the diagnostics channel
///
/// Syntax problems never show up here; they are diagnostics on a successful
/// [`ParseResult`](crate::ParseResult).
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text does not have the shape the called operation requires
    #[error(transparent)]
    InvalidFragment(#[from] ReviewError),

    #[error("parsing a {0} fragment is not implemented")]
    NotImplemented(FragmentKind),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    pub fn is_invalid_fragment(&self) -> bool {
        matches!(self, Error::InvalidFragment(_))
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented(_))
    }

    /// The rejected text, for shape violations
    pub fn rejected_text(&self) -> Option<&str> {
        match self {
            Error::InvalidFragment(review) => Some(review.source_text()),
            _ => None,
        }
    }
}
