//! Error types for brush parsing and world bookkeeping.

use thiserror::Error;

use crate::SolidId;

/// Errors surfaced by the strict parsers and the [`World`](crate::World) API.
///
/// Geometry problems (degenerate planes, fully clipped faces, unresolved
/// materials) are not errors; they shrink the face set instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A plane string did not match `(x y z) (x y z) (x y z)`.
    #[error("malformed plane `{input}`: expected `(x y z) (x y z) (x y z)`")]
    MalformedPlane { input: String },

    /// A UV axis string did not match `[x y z w] scale`.
    #[error("malformed uv axis `{input}`: expected `[x y z w] scale`")]
    MalformedUvTransform { input: String },

    /// No solid with this id is registered in the world.
    #[error("solid `{0}` does not exist")]
    UnknownSolid(SolidId),

    /// A solid with this id is already registered in the world.
    #[error("solid `{0}` already exists")]
    DuplicateSolid(SolidId),
}

pub type Result<T> = std::result::Result<T, Error>;
