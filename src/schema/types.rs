//! Canonical schema types
//!
//! A compiled schema is an ordered tree of [`FieldDescriptor`]s. Two variants
//! nest further schemas: `repeater` (a list of sub-documents sharing one field
//! list) and `layout` (a list of tagged blocks whose field list is chosen by
//! the element's `block_type`).
//!
//! The serialized form of every type here is also a valid compiler input, so
//! compiling canonical output yields the same descriptor again.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every `type` string a field may declare, in display order.
pub const FIELD_TYPES: &[&str] = &[
    "text", "textarea", "richtext", "slug", "number", "boolean", "date", "datetime", "time",
    "json", "select", "radio", "enum", "color", "tags", "password", "asset", "assets",
    "relation", "repeater", "layout",
];

/// Field types that may carry `localized: true`.
pub const LOCALIZABLE_TYPES: &[&str] = &[
    "text", "textarea", "richtext", "slug", "number", "boolean", "date", "datetime", "time",
    "json", "select", "radio", "enum", "color",
];

/// Top-level schema kinds.
pub const SCHEMA_KINDS: &[&str] = &["collection", "singleton", "tree"];

/// Declared option values for choice-like fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    #[serde(default)]
    pub values: Vec<String>,
}

impl OptionSet {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// An empty option set places no constraint on values.
    pub fn is_open(&self) -> bool {
        self.values.is_empty()
    }

    pub fn allows(&self, value: &str) -> bool {
        self.is_open() || self.values.iter().any(|v| v == value)
    }
}

/// Target of a relation field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    /// Handle of the target collection, resolved per space at validation time.
    pub collection: String,
    /// `Some(1)` for a single reference, `None` for an unbounded list.
    pub max: Option<u8>,
}

impl RelationSpec {
    /// Builds a relation target, normalizing `max` to exactly `1` or `None`.
    pub fn new(collection: impl Into<String>, max: Option<u8>) -> Self {
        Self {
            collection: collection.into(),
            max: max.filter(|m| *m == 1),
        }
    }

    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }
}

/// Variant-specific part of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Richtext,
    Slug {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_field: Option<String>,
    },
    Number,
    Boolean,
    Date,
    Datetime,
    Time,
    Json,
    Select {
        options: OptionSet,
    },
    Radio {
        options: OptionSet,
    },
    Enum {
        options: OptionSet,
    },
    /// Free hex colour when the palette is empty.
    Color {
        options: OptionSet,
    },
    Tags {
        options: OptionSet,
    },
    Password,
    Asset {
        allowed_kinds: Vec<String>,
    },
    Assets {
        allowed_kinds: Vec<String>,
    },
    Relation {
        relation: RelationSpec,
    },
    Repeater {
        fields: Vec<FieldDescriptor>,
    },
    Layout {
        blocks: Vec<Block>,
    },
}

impl FieldKind {
    /// Returns the `type` string of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Richtext => "richtext",
            FieldKind::Slug { .. } => "slug",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Datetime => "datetime",
            FieldKind::Time => "time",
            FieldKind::Json => "json",
            FieldKind::Select { .. } => "select",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Color { .. } => "color",
            FieldKind::Tags { .. } => "tags",
            FieldKind::Password => "password",
            FieldKind::Asset { .. } => "asset",
            FieldKind::Assets { .. } => "assets",
            FieldKind::Relation { .. } => "relation",
            FieldKind::Repeater { .. } => "repeater",
            FieldKind::Layout { .. } => "layout",
        }
    }

    pub fn is_localizable(&self) -> bool {
        LOCALIZABLE_TYPES.contains(&self.type_name())
    }
}

/// Canonical, compiled description of one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub handle: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub localized: bool,
}

impl FieldDescriptor {
    pub fn new(handle: impl Into<String>, kind: FieldKind) -> Self {
        let handle = handle.into();
        Self {
            label: humanize(&handle),
            handle,
            kind,
            required: false,
            localized: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Canonical JSON form; a valid compiler input.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One named variant of a `layout` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Discriminant matched against an element's `block_type`.
    #[serde(rename = "type")]
    pub block_type: String,
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl Block {
    pub fn new(block_type: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        let block_type = block_type.into();
        Self {
            label: humanize(&block_type),
            block_type,
            fields,
        }
    }
}

/// A compiled collection, singleton or tree schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub handle: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl Schema {
    pub fn new(handle: impl Into<String>, kind: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            handle: handle.into(),
            kind: kind.into(),
            fields,
            settings: Map::new(),
        }
    }

    /// Looks up a top-level field by handle.
    pub fn field(&self, handle: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.handle == handle)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Turns a handle such as `hero_image` into `Hero Image`.
pub fn humanize(handle: &str) -> String {
    handle
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
