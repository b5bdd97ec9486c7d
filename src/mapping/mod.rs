//! Category-to-material rules and the session state that holds them.

mod picked_face;

pub use picked_face::PickedFaceItem;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::host::{Document, ElementId};

/// One rule: elements of `category` whose `parameter` equals
/// `parameter_value` get `material`.
///
/// The category comes from observed element data when the mapping is
/// created; the rest is filled in by the user afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    #[serde(default)]
    pub checked: bool,
    category: String,
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub parameter_value: Option<String>,
    #[serde(default)]
    pub material: String,
}

impl CategoryMapping {
    /// Creates an unchecked mapping for `category` with no rule or material.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            checked: false,
            category: category.into(),
            parameter: None,
            parameter_value: None,
            material: String::new(),
        }
    }

    /// Restricts the mapping to elements whose `parameter` equals `value`.
    #[must_use]
    pub fn with_rule(mut self, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self.parameter_value = Some(value.into());
        self
    }

    /// Assigns the material name and checks the mapping.
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self.checked = true;
        self
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns `true` if this checked mapping has a material and applies to
    /// `element`. Comparisons are exact and case-sensitive.
    pub fn matches<D: Document + ?Sized>(&self, doc: &D, element: ElementId) -> bool {
        if !self.checked || self.material.is_empty() {
            return false;
        }
        if doc.element_category(element).as_deref() != Some(self.category.as_str()) {
            return false;
        }
        match self.parameter.as_deref() {
            None | Some("") => true,
            Some(name) => {
                let actual = doc.element_parameter(element, name).unwrap_or_default();
                actual == self.parameter_value.as_deref().unwrap_or_default()
            }
        }
    }
}

/// Which face categories a paint run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintOptions {
    pub side: bool,
    pub bottom: bool,
    pub interfaces: bool,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            side: true,
            bottom: true,
            interfaces: false,
        }
    }
}

/// Restorable session state: rules, options and picked faces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfiguration {
    pub mappings: Vec<CategoryMapping>,
    pub options: PaintOptions,
    pub picked_faces: Vec<PickedFaceItem>,
}

impl MappingConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unchecked mapping per category seen in `elements` that is not
    /// mapped yet, in first-seen order. Returns how many were added.
    pub fn observe_categories<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        elements: &[ElementId],
    ) -> usize {
        let mut added = 0;
        for &element in elements {
            let Some(category) = doc.element_category(element) else {
                continue;
            };
            if category.is_empty() || self.mappings.iter().any(|m| m.category == category) {
                continue;
            }
            self.mappings.push(CategoryMapping::new(category));
            added += 1;
        }
        added
    }

    /// Returns the first mapping that applies to `element`.
    pub fn rule_for<D: Document + ?Sized>(
        &self,
        doc: &D,
        element: ElementId,
    ) -> Option<&CategoryMapping> {
        self.mappings.iter().find(|m| m.matches(doc, element))
    }

    /// Checked picked faces that still carry a captured plane.
    #[must_use]
    pub fn active_picked_faces(&self) -> Vec<PickedFaceItem> {
        self.picked_faces
            .iter()
            .filter(|item| item.checked && item.plane().is_some())
            .cloned()
            .collect()
    }

    /// Checks that every checked mapping names a category and a material.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMapping`] for the first incomplete
    /// mapping.
    pub fn validate(&self) -> Result<()> {
        for mapping in self.mappings.iter().filter(|m| m.checked) {
            if mapping.category.is_empty() {
                return Err(ConfigError::InvalidMapping("mapping without category".into()).into());
            }
            if mapping.material.is_empty() {
                return Err(ConfigError::InvalidMapping(format!(
                    "category {} has no material",
                    mapping.category
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Serializes the descriptive state to JSON. Session geometry is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Malformed(e).into())
    }

    /// Restores a configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if the text is not a valid
    /// configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Malformed(e).into())
    }
}
