//! Frames and their per-tag attribute values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Value of a single frame attribute.
///
/// Attributes on the wire are a category name, a boolean switch, a number
/// or a list of numbers. Only [`AttributeValue::Categorical`] values take part
/// in tagging evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// On/off switch.
    Switch(bool),
    /// Named category, e.g. `"rainy"`.
    Categorical(String),
    /// Scalar number.
    Number(f64),
    /// Numeric payload.
    Numeric(Vec<f64>),
}

impl AttributeValue {
    /// Category name, if this value is categorical.
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Categorical(name) => Some(name),
            _ => None,
        }
    }

    /// Short description of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Switch(_) => "switch",
            Self::Categorical(_) => "categorical",
            Self::Number(_) => "number",
            Self::Numeric(_) => "numeric",
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Categorical(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Categorical(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Switch(value)
    }
}

/// Attribute map carried by a frame.
pub type Attributes = HashMap<String, AttributeValue>;

/// A single labeled (or predicted) frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame name, unique within its video.
    pub name: String,
    /// Video the frame belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_name: Option<String>,
    /// Source URL of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Position of the frame inside its video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<u32>,
    /// Tag attributes. `None` means nothing was recorded for this frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Frame {
    /// Create a frame with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the video name.
    #[must_use]
    pub fn with_video(mut self, video_name: impl Into<String>) -> Self {
        self.video_name = Some(video_name.into());
        self
    }

    /// Set one attribute, creating the attribute map if needed.
    #[must_use]
    pub fn with_attribute(mut self, tag: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes
            .get_or_insert_with(HashMap::new)
            .insert(tag.into(), value.into());
        self
    }

    /// Key used to match predictions with ground truth.
    pub fn key(&self) -> (Option<&str>, &str) {
        (self.video_name.as_deref(), self.name.as_str())
    }

    /// Look up a single attribute.
    pub fn attribute(&self, tag: &str) -> Option<&AttributeValue> {
        self.attributes.as_ref().and_then(|attrs| attrs.get(tag))
    }
}
