use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::schema;

/// Stable identifier of an entity within a [`Model`](super::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

/// A typed attribute or property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Ref(EntityId),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Scalar text form used for comparisons, `None` for lists and maps.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Ref(id) => Some(id.to_string()),
            Value::List(_) | Value::Map(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Boolean(b) => f.write_str(if *b { "Yes" } else { "No" }),
            Value::Ref(id) => write!(f, "{id}"),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
            Value::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Ref(id)
    }
}

/// Anything that exposes named attributes: entities, type objects and
/// nested attribute mappings.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<&Value>;
}

impl AttributeSource for BTreeMap<String, Value> {
    fn attribute(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// A typed record in the building-model graph.
///
/// The id and class are fixed at creation; attributes are edited through
/// [`Model::set_attribute`](super::Model::set_attribute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    class: String,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, class: impl Into<String>) -> Self {
        Self {
            id,
            class: class.into(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Entity type tag, e.g. `IfcWallStandardCase`.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.attributes
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("Name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn global_id(&self) -> Option<&str> {
        self.attributes.get("GlobalId").and_then(Value::as_str)
    }

    /// True if the entity's class is `class` or one of its subclasses.
    #[must_use]
    pub fn is_a(&self, class: &str) -> bool {
        schema::is_a(&self.class, class)
    }

    /// Display label: the Name attribute, or class and id.
    #[must_use]
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("{} {}", self.class, self.id),
        }
    }
}

impl AttributeSource for Entity {
    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.class)?;
        if let Some(name) = self.name() {
            write!(f, " '{name}'")?;
        }
        Ok(())
    }
}
