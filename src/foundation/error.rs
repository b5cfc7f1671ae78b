use crate::scene::model::Phase;

/// Crate-wide result alias.
pub type SlidewaveResult<T> = Result<T, SlidewaveError>;

/// Errors produced while configuring or rendering a show.
#[derive(thiserror::Error, Debug)]
pub enum SlidewaveError {
    /// Configuration error detected before any frame is produced.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing/undecodable input or a failing output sink.
    #[error("resource error: {0}")]
    Resource(String),

    /// Internal invariant violated during rendering.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Show description could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Error raised while rendering a specific slide phase.
    #[error("slide {index} ({phase}): {source}")]
    Slide {
        /// 0-based slide index in the show.
        index: usize,
        /// Phase being rendered when the error occurred.
        phase: Phase,
        /// Underlying error.
        #[source]
        source: Box<SlidewaveError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidewaveError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attach slide/phase context. Errors that already carry context are returned unchanged.
    pub fn in_slide(self, index: usize, phase: Phase) -> Self {
        match self {
            Self::Slide { .. } => self,
            other => Self::Slide {
                index,
                phase,
                source: Box::new(other),
            },
        }
    }

    /// Return `true` for configuration errors (including wrapped ones).
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Slide { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
