//! Column descriptors shared by every row of a roster table.

use serde::{Deserialize, Serialize};

/// How a column is edited and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Select,
    Number,
}

/// One choice of a select column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label and value are the same text.
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: text,
        }
    }
}

/// Bounds applied to a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.max_length.is_none()
    }
}

/// Static metadata describing how a field renders and validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
}

impl ColumnDescriptor {
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            kind: ColumnKind::Text,
            options: Vec::new(),
            constraints: Constraints::default(),
        }
    }

    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            kind: ColumnKind::Select,
            options,
            ..Self::text(key, label)
        }
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ColumnKind::Number,
            ..Self::text(key, label)
        }
    }

    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.constraints.max_length = Some(max_length);
        self
    }

    /// Option whose value matches `value`.
    pub fn option_for_value(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Option whose label matches `label`.
    pub fn option_for_label(&self, label: &str) -> Option<&SelectOption> {
        self.options.iter().find(|option| option.label == label)
    }
}
