/// Convenience result type used across cyclefade.
pub type CompositorResult<T> = Result<T, CompositorError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Configuration problems are reported at construction time; per-frame math never fails once a
/// compositor exists. Resource failures come from the rendering backend.
#[derive(thiserror::Error, Debug)]
pub enum CompositorError {
    /// Invalid cycle, phase, layout or curve parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Render-target allocation or lookup failures reported by a backend.
    #[error("resource error: {0}")]
    Resource(String),

    /// Invalid animation curve or occupant schedule definitions.
    #[error("animation error: {0}")]
    Animation(String),

    /// Backend failures while rendering a slot or drawing the composite.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompositorError {
    /// Build a [`CompositorError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`CompositorError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`CompositorError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`CompositorError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CompositorError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for backend resource failures.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
