//! # tagscore
//!
//! Image tagging evaluation in Rust.
//!
//! tagscore scores predicted frame tags against ground truth:
//!
//! - **Core**: frames, attribute values and the label config
//! - **Data**: dataset and config loading, prediction alignment
//! - **Analysis**: confusion counts, precision/recall/F-score, classification reports
//! - **Eval**: per-tag evaluation with per-tag and overall averages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tagscore::prelude::*;
//!
//! let gts = load_dataset("gt.json")?;
//! let preds = load_dataset("preds.json")?.frames;
//! let config = load_label_config("configs.toml")?;
//!
//! let result = evaluate_tagging(&gts.frames, &preds, &config, default_nproc())?;
//! println!("{}", result);
//! println!("{:?}", result.summary());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use tagscore_analysis as analysis;
pub use tagscore_core as core;
pub use tagscore_data as data;
pub use tagscore_eval as eval;

/// Prelude module for convenient imports.
///
/// ```rust
/// use tagscore::prelude::*;
///
/// let config = Config::new(vec![Category::with_children("weather", ["rainy", "clear"])]);
/// let gts = vec![Frame::new("0.jpg").with_attribute("weather", "rainy")];
/// let result = evaluate_tagging(&gts, &gts, &config, 1).unwrap();
/// assert_eq!(result.accuracy[2].get(AVERAGE), Some(100.0));
/// ```
pub mod prelude {
    // Core types
    pub use tagscore_core::{AttributeValue, Category, Config, Frame, TagGroup};

    // Data
    pub use tagscore_data::{load_dataset, load_label_config, reorder_preds, write_json, Dataset};

    // Analysis
    pub use tagscore_analysis::{
        compute_scores, multilabel_confusion_matrix, precision_recall_fscore_support, ScoreReport,
    };

    // Eval
    pub use tagscore_eval::{
        default_nproc, evaluate_tagging, MetricKind, Scores, TaggingResult, AVERAGE,
    };
}
