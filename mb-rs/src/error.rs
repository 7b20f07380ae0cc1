//! Error types.
//!
//! Parse failures carry an [`ErrorKind`] drawn from the build tool's
//! historical return-code table, so the numeric code of every kind is stable
//! and can still be reported to scripts that check exit statuses.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Classification of a parse or registration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("unknown error")]
    Unknown,
    #[error("missing required element")]
    MissingRequiredElement,
    #[error("duplicate sector")]
    DuplicateSector,
    #[error("duplicate section")]
    DuplicateSection,
    #[error("duplicate field")]
    DuplicateField,
    #[error("invalid identifier")]
    InvalidIdentifier,
    #[error("invalid syntax")]
    InvalidSyntax,
}

impl ErrorKind {
    /// Return code used for successful operations.
    pub const OK_CODE: u32 = 0x000;

    /// Numeric return code for this kind.
    pub fn code(self) -> u32 {
        match self {
            ErrorKind::Unknown                => 0x001,
            ErrorKind::MissingRequiredElement => 0x101,
            ErrorKind::DuplicateSection       => 0x102,
            ErrorKind::DuplicateSector        => 0x103,
            ErrorKind::DuplicateField         => 0x104,
            ErrorKind::InvalidIdentifier      => 0x105,
            ErrorKind::InvalidSyntax          => 0x106,
        }
    }

    /// Look a kind up by its numeric code.
    pub fn from_code(code: u32) -> Option<Self> {
        [
            ErrorKind::Unknown,
            ErrorKind::MissingRequiredElement,
            ErrorKind::DuplicateSection,
            ErrorKind::DuplicateSector,
            ErrorKind::DuplicateField,
            ErrorKind::InvalidIdentifier,
            ErrorKind::InvalidSyntax,
        ]
        .into_iter()
        .find(|k| k.code() == code)
    }
}

/// A line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: `{text}`")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub kind: ErrorKind,
    /// The offending line, trimmed.
    pub text: String,
}

/// Failure while interpolating field references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Resolving `path` led back to `path` itself.
    #[error("cyclic reference through `{path}`")]
    CyclicReference { path: String },

    /// The reference chain reached `path` nested more than `limit` deep.
    #[error("reference chain deeper than {limit} at `{path}`")]
    TooDeep { path: String, limit: usize },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl Error {
    /// The parse kind, if this is a parse error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Parse(e) => Some(e.kind),
            _ => None,
        }
    }

    /// The 1-based line a parse error occurred on.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse(e) => Some(e.line),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ── Tests ─────────────────────────────────────────────────────────────────────
