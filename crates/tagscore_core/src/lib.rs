//! # tagscore_core
//!
//! Core label types for tagscore tagging evaluation.
//!
//! This crate provides:
//! - [`Frame`] and [`AttributeValue`] for per-frame tag attributes
//! - [`Config`] and [`Category`] for the label schema
//! - [`TagGroup`] for a tag and the classes it enumerates
//! - Error types and common utilities
//!
//! ## Example
//!
//! ```rust
//! use tagscore_core::{Category, Config, Frame};
//!
//! let config = Config::new(vec![Category::with_children("weather", ["rainy", "clear"])]);
//! let frame = Frame::new("0001.jpg").with_attribute("weather", "rainy");
//!
//! assert_eq!(config.parent_categories()[0].classes, vec!["rainy", "clear"]);
//! assert_eq!(frame.attribute("weather").and_then(|v| v.as_category()), Some("rainy"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod frame;

pub use config::{Attribute, Category, Config, ImageSize, TagGroup};
pub use error::{CoreError, Result};
pub use frame::{AttributeValue, Attributes, Frame};
