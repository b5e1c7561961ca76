//! Error types for tagging evaluation.

use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that abort a tagging evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The label config declares no parent category to evaluate.
    #[error("Tag attributes must be specified as supercategories")]
    NoTagCategories,

    /// A labeled frame has a prediction without any attributes.
    #[error("Prediction for frame '{frame}' has no attributes")]
    MissingPredictionAttributes {
        /// Frame name.
        frame: String,
    },

    /// An attribute map lacks the evaluated tag.
    #[error("Tag '{tag}' missing from {side} attributes of frame '{frame}'")]
    MissingAttribute {
        /// Tag name.
        tag: String,
        /// Frame name.
        frame: String,
        /// `"ground truth"` or `"prediction"`.
        side: &'static str,
    },

    /// The tag value is not a class name.
    #[error("Tag '{tag}' of frame '{frame}' must be categorical, got {kind}")]
    NonCategoricalAttribute {
        /// Tag name.
        tag: String,
        /// Frame name.
        frame: String,
        /// Kind of the offending value.
        kind: &'static str,
    },

    /// The tag value is not one of the declared classes.
    #[error("Unknown class '{class}' for tag '{tag}' in frame '{frame}'")]
    UnknownClass {
        /// Tag name.
        tag: String,
        /// Class name found in the data.
        class: String,
        /// Frame name.
        frame: String,
    },

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Scoring error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] tagscore_analysis::AnalysisError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
