/// Convenience result type used across stagesync.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// The compile service rejected the override set. Carries the raw service
    /// message, which the UI renders verbatim in a dismissible banner.
    #[error("compile error: {0}")]
    Compile(String),

    /// Compiled module text could not be instantiated as a scene module.
    #[error("load error: {0}")]
    Load(String),

    /// A selected or hit-tested node could not be found in the current render
    /// tree. Legitimately happens when a clip is not currently rendered, so
    /// callers treat this as a silent non-match.
    #[error("node resolution error: {0}")]
    NodeResolution(String),

    /// Matrix inversion or bounding-box computation failed for a node.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Reading or writing the durable module cache failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Compile`] value.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    /// Build a [`StageError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`StageError::NodeResolution`] value.
    pub fn node_resolution(msg: impl Into<String>) -> Self {
        Self::NodeResolution(msg.into())
    }

    /// Build a [`StageError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`StageError::Cache`] value.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
