use thiserror::Error;

use crate::host::{ElementId, FaceHandle, SolidHandle};

/// Top-level error type for the face painting engine.
#[derive(Debug, Error)]
pub enum FacePaintError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("face is not planar")]
    NotPlanar,

    #[error("face has no triangles")]
    EmptyTriangulation,
}

/// Failures reported by the host document for a single call.
///
/// None of these leave the document in an inconsistent state; the engine
/// treats them as per-face rejections.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("element {0} not found")]
    ElementNotFound(ElementId),

    #[error("solid {0:?} not found")]
    SolidNotFound(SolidHandle),

    #[error("face {0:?} not found")]
    FaceNotFound(FaceHandle),

    #[error("face {face:?} of element {element} is already painted")]
    AlreadyPainted { element: ElementId, face: FaceHandle },

    #[error("face {face:?} of element {element} is not painted")]
    NotPainted { element: ElementId, face: FaceHandle },

    #[error("geometry unavailable: {0}")]
    GeometryUnavailable(String),

    #[error("host rejected the call: {0}")]
    Rejected(String),
}

/// Errors related to restoring or storing a mapping configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid mapping: {0}")]
    InvalidMapping(String),
}

/// Convenience type alias for results using [`FacePaintError`].
pub type Result<T> = std::result::Result<T, FacePaintError>;
