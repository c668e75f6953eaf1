use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::datatype::{Component, DatatypeGroup};

/// One column of a `DESCRIBE`-style schema introspection result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    #[serde(rename = "Field")]
    pub field: String,

    /// Raw SQL type, e.g. `varchar(255)` or `int(11) unsigned`.
    #[serde(rename = "Type", default)]
    pub r#type: String,

    /// `"YES"` when the column accepts `NULL`.
    #[serde(rename = "Null", default)]
    pub null: String,

    #[serde(rename = "Comment", default)]
    pub comment: String,

    #[serde(alias = "Default", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ColumnDescription {
    pub fn new(field: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            r#type: r#type.into(),
            null: "NO".to_string(),
            ..Default::default()
        }
    }

    pub fn nullable(mut self) -> Self {
        self.null = "YES".to_string();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.null == "YES"
    }

    /// Default value as shown in a form. Falsy values (`null`, `false`, `0`,
    /// `""`) render as an empty string.
    pub fn default_text(&self) -> String {
        match &self.default {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// A data row. Either `{ id, attributes: {..} }` or a flat object carrying
/// `id`; other top-level keys of a flat row are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

impl Resource {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: Some(Map::new()),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Input of [`meta`](crate::meta): rows plus the column metadata describing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub data: Option<Vec<Resource>>,

    #[serde(default)]
    pub descriptions: Option<Vec<ColumnDescription>>,
}

impl Dataset {
    pub fn new(data: Vec<Resource>, descriptions: Vec<ColumnDescription>) -> Self {
        Self {
            data: Some(data),
            descriptions: Some(descriptions),
        }
    }
}

/// Everything a template needs to draw one input for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViewModel {
    pub name: String,
    pub label: String,
    pub value: Option<Value>,
    pub optional: bool,
    pub default: String,
    pub length: u64,
    pub datatype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype_group: Option<DatatypeGroup>,
    pub component: Component,
}

/// Output of [`meta`](crate::meta). `data` holds one row of field view-models
/// per input resource, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedDataset {
    pub data: Vec<Vec<FieldViewModel>>,
    pub descriptions: Vec<ColumnDescription>,
}
