use super::Resource;

/// Errors raised by [`Engine`](super::Engine) backends.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown or already disposed {0}")]
    UnknownResource(Resource),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("could not create {0}")]
    CreationFailed(String),
}
