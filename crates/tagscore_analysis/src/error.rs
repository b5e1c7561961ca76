//! Error types for tagscore_analysis.

use thiserror::Error;

/// Result type alias using [`AnalysisError`].
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while building classification reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The observed classes and the supplied class names disagree in size.
    #[error(
        "Number of classes, {n_labels}, does not match size of target_names, {n_names}. \
         Provide one name per observed class"
    )]
    ClassCountMismatch {
        /// Distinct class indices observed in the label arrays.
        n_labels: usize,
        /// Supplied class names.
        n_names: usize,
    },
}
