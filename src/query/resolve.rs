//! Attribute-path resolution.
//!
//! A path resolves to zero or more values. Zero means "absent" and never
//! satisfies a predicate; several values come from lists and from
//! multi-valued associations such as materials.

use super::facade;
use crate::error::QueryError;
use crate::model::{AttributeSource, Entity, EntityId, Model, Value};

/// Resolve `path` on `entity`, falling back to its type object when the
/// instance lacks the attribute or property and `type_fallback` is set.
pub(crate) fn resolve_path(
    model: &Model,
    entity: &Entity,
    path: &[String],
    type_fallback: bool,
) -> Result<Vec<Value>, QueryError> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(Vec::new());
    };

    let values = match (head.as_str(), rest.is_empty()) {
        ("type", false) => match type_object(model, entity) {
            Some(type_entity) => resolve_path(model, type_entity, rest, false)?,
            None => Vec::new(),
        },
        ("container", false) => match facade::get_container(model, entity.id())? {
            Some(container) => resolve_path(model, container, rest, type_fallback)?,
            None => Vec::new(),
        },
        ("material", true) => associated(model, entity, type_fallback, |id| {
            model
                .materials_of(id)
                .iter()
                .map(|m| Value::from(m.as_str()))
                .collect()
        }),
        ("classification", true) => associated(model, entity, type_fallback, |id| {
            model
                .references_of(id)
                .iter()
                .map(|r| Value::from(r.identification.as_str()))
                .collect()
        }),
        ("id", true) => vec![id_value(entity.id())],
        ("class", true) => vec![Value::from(entity.class())],
        _ => match resolve_own(model, entity, path) {
            Some(own) => own,
            None if type_fallback => type_object(model, entity)
                .and_then(|type_entity| resolve_own(model, type_entity, path))
                .unwrap_or_default(),
            None => Vec::new(),
        },
    };
    Ok(values)
}

fn type_object<'m>(model: &'m Model, entity: &Entity) -> Option<&'m Entity> {
    model.type_of(entity.id()).and_then(|id| model.entity(id))
}

fn id_value(id: EntityId) -> Value {
    i64::try_from(id.0).map_or(Value::Ref(id), Value::Integer)
}

/// Associations only exist once assigned, so an empty list means the
/// instance has none of its own.
fn associated(
    model: &Model,
    entity: &Entity,
    type_fallback: bool,
    values_of: impl Fn(EntityId) -> Vec<Value>,
) -> Vec<Value> {
    let own = values_of(entity.id());
    if !own.is_empty() || !type_fallback {
        return own;
    }
    model.type_of(entity.id()).map(values_of).unwrap_or_default()
}

/// Direct attribute first, then `Pset.Property`.
///
/// `None` when the entity has neither, so the caller may consult the type.
/// A present attribute holding an empty list is `Some(vec![])`.
fn resolve_own(model: &Model, entity: &Entity, path: &[String]) -> Option<Vec<Value>> {
    let (head, rest) = path.split_first()?;
    if entity.attribute(head).is_some() {
        return Some(lookup(model, entity, path));
    }
    let (property, deeper) = rest.split_first()?;
    model
        .property_sets_of(entity.id())
        .iter()
        .find(|pset| pset.name == *head)
        .and_then(|pset| pset.get(property))
        .map(|value| descend(model, value, deeper))
}

fn lookup<S: AttributeSource + ?Sized>(model: &Model, source: &S, path: &[String]) -> Vec<Value> {
    let Some((head, rest)) = path.split_first() else {
        return Vec::new();
    };
    source
        .attribute(head)
        .map(|value| descend(model, value, rest))
        .unwrap_or_default()
}

/// Walk the remaining segments into nested maps, lists and referenced
/// entities.
fn descend(model: &Model, value: &Value, rest: &[String]) -> Vec<Value> {
    if rest.is_empty() {
        return flatten(value);
    }
    match value {
        Value::Map(map) => lookup(model, map, rest),
        Value::Ref(id) => model
            .entity(*id)
            .and_then(|target| resolve_own(model, target, rest))
            .unwrap_or_default(),
        Value::List(items) => items
            .iter()
            .flat_map(|item| descend(model, item, rest))
            .collect(),
        _ => Vec::new(),
    }
}

fn flatten(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.iter().flat_map(flatten).collect(),
        other => vec![other.clone()],
    }
}

/// Split a dotted path, rejecting empty segments.
pub(crate) fn parse_path(path: &str) -> Result<Vec<String>, QueryError> {
    let segments: Vec<String> = path.split('.').map(|s| s.trim().to_string()).collect();
    if segments.iter().any(String::is_empty) {
        return Err(QueryError::malformed(path, "empty path segment"));
    }
    Ok(segments)
}
