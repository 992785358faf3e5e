/// Convenience result type used across paperdance.
pub type PaperdanceResult<T> = Result<T, PaperdanceError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only `Validation`, `DegeneratePath`, `Encoding` and `Cancelled` terminate a render job.
/// `Enhancement` is produced by settings enrichers and is always caught by the job.
#[derive(thiserror::Error, Debug)]
pub enum PaperdanceError {
    /// Invalid request data, rejected before any work begins.
    #[error("validation error: {0}")]
    Validation(String),

    /// A motion path could not be built from the generated anchors.
    #[error("degenerate path: {0}")]
    DegeneratePath(String),

    /// The optional settings enricher failed.
    #[error("enhancement error: {0}")]
    Enhancement(String),

    /// The external video encoder is missing or exited unsuccessfully.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The job observed its cancellation token.
    #[error("render job cancelled")]
    Cancelled,

    /// Raster decode/encode or filesystem failure.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaperdanceError {
    /// Build a [`PaperdanceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PaperdanceError::DegeneratePath`] value.
    pub fn degenerate_path(msg: impl Into<String>) -> Self {
        Self::DegeneratePath(msg.into())
    }

    /// Build a [`PaperdanceError::Enhancement`] value.
    pub fn enhancement(msg: impl Into<String>) -> Self {
        Self::Enhancement(msg.into())
    }

    /// Build a [`PaperdanceError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`PaperdanceError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Whether this error aborts a render job (as opposed to degrading it).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Enhancement(_))
    }
}

impl From<image::ImageError> for PaperdanceError {
    fn from(e: image::ImageError) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
