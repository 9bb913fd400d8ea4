use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Conceptual model: entities plus the relationships between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErModel {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Entity keyed by a stable `id`, distinct from its display `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
}

/// Association between two or more entities, optionally carrying its own attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub entity_id: String,
    pub cardinality: Cardinality,
}

/// Endpoint cardinality, serialized as `"1"` or `"N"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Cardinality {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "N")]
    Many,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Vec::new(),
        }
    }
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_primary_key: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key,
        }
    }
}

impl Endpoint {
    pub fn new(entity_id: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            entity_id: entity_id.into(),
            cardinality,
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::One => write!(f, "1"),
            Cardinality::Many => write!(f, "N"),
        }
    }
}
