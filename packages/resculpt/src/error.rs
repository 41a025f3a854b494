//! Engine error taxonomy.
//!
//! Path grammar and matcher-build failures surface at engine construction
//! and prevent the engine from being used; read and write failures abort the
//! current transformation and are returned to the caller. Malformed JSON is
//! deliberately *not* an error: the engine passes bytes through on a best
//! effort basis rather than validating.

use std::io;

use thiserror::Error;

/// A `Result` alias where the `Err` case is [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while building or running a transformation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule path failed to parse; also covers matcher build failures,
    /// which are propagated from path parsing.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The input source failed mid-transformation.
    #[error("input read error: {0}")]
    Read(#[source] io::Error),

    /// The output sink failed mid-transformation. Partial output already
    /// written is not rolled back.
    #[error("output write error: {0}")]
    Write(#[source] io::Error),
}

/// Rule path grammar errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An empty segment: a leading or doubled `.`, a trailing `.`, or an
    /// empty path handed directly to the parser.
    #[error("empty segment")]
    EmptySegment,

    /// Bracket selector contents that are neither `*` nor base-10 digits,
    /// or malformed bracket syntax.
    #[error("invalid array index: {0}")]
    InvalidArrayIndex(String),
}
