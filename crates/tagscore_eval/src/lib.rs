//! # tagscore_eval
//!
//! Tagging evaluation for tagscore.
//!
//! [`evaluate_tagging`] scores predicted frame tags against ground truth for
//! every tag of a label config and returns a [`TaggingResult`] with
//! per-class precision, recall, F1-score and accuracy, per-tag averages and
//! a grand average.
//!
//! ## Example
//!
//! ```rust
//! use tagscore_core::{Category, Config, Frame};
//! use tagscore_eval::{evaluate_tagging, AVERAGE};
//!
//! let config = Config::new(vec![Category::with_children("weather", ["rainy", "clear"])]);
//! let gts = vec![
//!     Frame::new("0.jpg").with_attribute("weather", "rainy"),
//!     Frame::new("1.jpg").with_attribute("weather", "clear"),
//! ];
//!
//! let result = evaluate_tagging(&gts, &gts, &config, 1).unwrap();
//! assert_eq!(result.accuracy[2].get(AVERAGE), Some(100.0));
//! assert_eq!(result.summary().get("precision/WEATHER"), Some(100.0));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod result;
mod tagging;

pub use error::{EvalError, Result};
pub use result::{nanmean, MetricKind, Scores, ScoresList, TaggingResult, AVERAGE};
pub use tagging::{default_nproc, evaluate_tagging, MAX_DEFAULT_NPROC};
