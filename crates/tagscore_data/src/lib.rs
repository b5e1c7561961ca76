//! # tagscore_data
//!
//! Data loading for tagscore tagging evaluation.
//!
//! This crate provides:
//! - [`load_dataset`] for frame lists stored as JSON files or directories
//! - [`load_label_config`] for TOML or JSON label configs
//! - [`reorder_preds`] to align predictions with ground truth
//! - [`write_json`] for result files

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod io;
mod reorder;

pub use error::{DataError, Result};
pub use io::{load_dataset, load_label_config, write_json, Dataset};
pub use reorder::reorder_preds;
