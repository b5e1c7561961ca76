//! # tagscore_analysis
//!
//! Classification metrics for tagscore: confusion counts, precision/recall/F-score and
//! classification reports.
//!
//! This crate provides tools for scoring a single tag:
//! - One-vs-rest confusion counts per class
//! - Precision, recall, F-beta and support with divide-by-zero-safe semantics
//! - Classification reports with a macro average and accuracy

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod confusion;
mod error;
mod metrics;
mod report;

pub use confusion::{multilabel_confusion_matrix, unique_labels, ClassConfusion, MultilabelConfusion};
pub use error::{AnalysisError, Result};
pub use metrics::{f_beta, precision_recall_fscore_support, prf_divide, safe_divide, PrfSupport, DEFAULT_BETA};
pub use report::{
    accuracy_score, compute_scores, ClassScores, ReportMetric, ScoreRecord, ScoreReport, ACCURACY,
    MACRO_AVG,
};
