//! Label configuration: categories, attributes and tag groupings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A label category. Categories with subcategories act as tag groupings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Child categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<Category>>,
}

impl Category {
    /// Create a leaf category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcategories: None,
        }
    }

    /// Create a category with the given leaf children.
    pub fn with_children<I, S>(name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            subcategories: Some(children.into_iter().map(Category::new).collect()),
        }
    }

    /// Whether this category has any children.
    pub fn is_parent(&self) -> bool {
        self.subcategories.as_ref().is_some_and(|subs| !subs.is_empty())
    }
}

/// Annotation attribute declared by the label tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Tool type, e.g. `"switch"` or `"list"`.
    #[serde(default)]
    pub tool_type: String,
    /// Allowed values for list attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A tag and its class enumeration, derived from a parent category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    /// Tag name, e.g. `"weather"`.
    pub name: String,
    /// Class names in declaration order.
    pub classes: Vec<String>,
}

/// Dataset label configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Image resolution, if fixed for the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
    /// Declared attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    /// Category tree.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Config {
    /// Create a config from a category tree.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Default::default()
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the config as TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Every parent category mapped to its leaf classes.
    ///
    /// Parents are listed in declaration order; a nested parent follows the
    /// parent that contains it.
    pub fn parent_categories(&self) -> Vec<TagGroup> {
        let mut groups = Vec::new();
        collect_parents(&self.categories, &mut groups);
        groups
    }

    /// All leaf categories in declaration order.
    pub fn leaf_categories(&self) -> Vec<&Category> {
        let mut leaves = Vec::new();
        collect_leaves(&self.categories, &mut leaves);
        leaves
    }
}

fn collect_parents(categories: &[Category], groups: &mut Vec<TagGroup>) {
    for category in categories {
        if let Some(children) = category.subcategories.as_deref().filter(|c| !c.is_empty()) {
            let mut leaves = Vec::new();
            collect_leaves(children, &mut leaves);
            groups.push(TagGroup {
                name: category.name.clone(),
                classes: leaves.into_iter().map(|leaf| leaf.name.clone()).collect(),
            });
            collect_parents(children, groups);
        }
    }
}

fn collect_leaves<'a>(categories: &'a [Category], leaves: &mut Vec<&'a Category>) {
    for category in categories {
        match category.subcategories.as_deref() {
            Some(children) if !children.is_empty() => collect_leaves(children, leaves),
            _ => leaves.push(category),
        }
    }
}
