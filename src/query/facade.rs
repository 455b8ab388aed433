//! Query facade: selection and traversal over a borrowed [`Model`].
//!
//! Every operation takes the model explicitly and never mutates it.

use nalgebra::Matrix4;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

use super::resolve::{parse_path, resolve_path};
use super::selector::Query;
use crate::error::QueryError;
use crate::model::{
    Classification, ClassificationReference, Entity, EntityId, Model, PropertyMap, PropertySet,
    PsetFilter, Value,
};

/// Lazy, single-pass sequence of entities matching a [`Query`].
///
/// Yields an error at most once, after which it is exhausted.
pub struct Selection<'m> {
    model: &'m Model,
    query: Query,
    candidates: std::slice::Iter<'m, Entity>,
    matched: usize,
    done: bool,
}

impl<'m> Selection<'m> {
    /// Drain into a vector, stopping at the first error.
    pub fn into_entities(self) -> Result<Vec<&'m Entity>, QueryError> {
        self.collect()
    }
}

impl<'m> Iterator for Selection<'m> {
    type Item = Result<&'m Entity, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for entity in self.candidates.by_ref() {
            match accepts(self.model, &self.query, entity) {
                Ok(true) => {
                    self.matched += 1;
                    return Some(Ok(entity));
                }
                Ok(false) => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        debug!(query = %self.query, matched = self.matched, "selection exhausted");
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.candidates.len()))
        }
    }
}

fn accepts(model: &Model, query: &Query, entity: &Entity) -> Result<bool, QueryError> {
    if !query.types.iter().any(|class| entity.is_a(class)) {
        return Ok(false);
    }
    if let Some(scope) = query.scope {
        let inside = container_ids(model, entity.id())?.contains(&scope);
        if !inside {
            trace!(entity = %entity.id(), %scope, "outside scope");
            return Ok(false);
        }
    }
    for predicate in &query.predicates {
        let values = resolve_path(model, entity, &predicate.path, query.type_fallback)?;
        if !predicate.comparator.matches(&values, &predicate.value) {
            trace!(entity = %entity.id(), %predicate, "predicate failed");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Select entities matching `query`.
///
/// The query is validated before any traversal; an unknown type tag simply
/// selects nothing.
pub fn select<'m>(model: &'m Model, query: &Query) -> Result<Selection<'m>, QueryError> {
    query.validate()?;
    if let Some(scope) = query.scope {
        require(model, scope)?;
    }
    debug!(%query, fallback = query.type_fallback, "selecting");
    Ok(Selection {
        model,
        query: query.clone(),
        candidates: model.entities(),
        matched: 0,
        done: false,
    })
}

/// Parse `expression` and select.
pub fn select_str<'m>(model: &'m Model, expression: &str) -> Result<Selection<'m>, QueryError> {
    let query = Query::parse(expression)?;
    select(model, &query)
}

fn require(model: &Model, id: EntityId) -> Result<&Entity, QueryError> {
    model.entity(id).ok_or(QueryError::UnknownEntity { id })
}

fn entities<'m>(model: &'m Model, ids: &[EntityId]) -> Vec<&'m Entity> {
    ids.iter().filter_map(|id| model.entity(*id)).collect()
}

/// Ids of every spatial or aggregate parent above `id`, nearest first.
fn container_ids(model: &Model, id: EntityId) -> Result<Vec<EntityId>, QueryError> {
    let mut visited = HashSet::from([id]);
    let mut chain = Vec::new();
    let mut current = id;
    while let Some(parent) = model
        .container_of(current)
        .or_else(|| model.aggregate_of(current))
    {
        if !visited.insert(parent) {
            warn!(start = %id, repeated = %parent, "cyclic containment");
            return Err(QueryError::CyclicGraph {
                relation: "containment",
                start: id,
                repeated: parent,
            });
        }
        chain.push(parent);
        current = parent;
    }
    Ok(chain)
}

/// Direct spatial container of an element, e.g. the storey of a wall.
///
/// The upward chain is checked, so corrupt cyclic containment fails with
/// [`QueryError::CyclicGraph`] instead of looping.
pub fn get_container(model: &Model, id: EntityId) -> Result<Option<&Entity>, QueryError> {
    require(model, id)?;
    container_ids(model, id)?;
    Ok(model.container_of(id).and_then(|c| model.entity(c)))
}

/// Full upward path: storey, building, site, project.
pub fn container_chain(model: &Model, id: EntityId) -> Result<Vec<&Entity>, QueryError> {
    require(model, id)?;
    let ids = container_ids(model, id)?;
    Ok(entities(model, &ids))
}

/// Direct children (contained elements and aggregated parts) in insertion
/// order. Not recursive.
pub fn get_decomposition(model: &Model, id: EntityId) -> Result<Vec<&Entity>, QueryError> {
    require(model, id)?;
    Ok(entities(model, model.children_of(id)))
}

/// What `id` is a part of.
pub fn get_aggregate(model: &Model, id: EntityId) -> Result<Option<&Entity>, QueryError> {
    require(model, id)?;
    Ok(model.aggregate_of(id).and_then(|w| model.entity(w)))
}

/// Aggregated parts of `id`, without contained elements.
pub fn get_parts(model: &Model, id: EntityId) -> Result<Vec<&Entity>, QueryError> {
    require(model, id)?;
    Ok(model
        .children_of(id)
        .iter()
        .filter(|child| model.aggregate_of(**child) == Some(id))
        .filter_map(|child| model.entity(*child))
        .collect())
}

/// World transform of an element's placement.
///
/// Entities without a placement sit at the identity.
pub fn resolve_world_placement(model: &Model, id: EntityId) -> Result<Matrix4<f64>, QueryError> {
    require(model, id)?;
    let mut visited = HashSet::from([id]);
    let mut world = Matrix4::identity();
    let mut current = model.placement_of(id);

    while let Some(placement) = current {
        world = placement.matrix * world;
        let Some(parent) = placement.relative_to else {
            break;
        };
        if !visited.insert(parent) {
            warn!(start = %id, repeated = %parent, "cyclic placement");
            return Err(QueryError::CyclicGraph {
                relation: "placement",
                start: id,
                repeated: parent,
            });
        }
        current = model.placement_of(parent);
    }
    Ok(world)
}

/// Property sets and quantity sets of an entity as owned copies.
///
/// With `include_inherited`, the type object's sets are merged underneath;
/// instance values win per property.
pub fn get_property_sets(
    model: &Model,
    id: EntityId,
    include_inherited: bool,
) -> Result<PropertyMap, QueryError> {
    get_property_sets_filtered(model, id, include_inherited, PsetFilter::All)
}

pub fn get_property_sets_filtered(
    model: &Model,
    id: EntityId,
    include_inherited: bool,
    filter: PsetFilter,
) -> Result<PropertyMap, QueryError> {
    require(model, id)?;
    let mut merged = PropertyMap::new();
    if include_inherited {
        if let Some(type_id) = model.type_of(id) {
            merge_sets(&mut merged, model.property_sets_of(type_id), filter);
        }
    }
    merge_sets(&mut merged, model.property_sets_of(id), filter);
    Ok(merged)
}

fn merge_sets(merged: &mut PropertyMap, sets: &[PropertySet], filter: PsetFilter) {
    for pset in sets.iter().filter(|p| filter.accepts(p.kind)) {
        let target = merged.entry(pset.name.clone()).or_default();
        for (name, value) in &pset.properties {
            target.insert(name.clone(), value.clone());
        }
    }
}

/// Type object of an instance.
pub fn get_type(model: &Model, id: EntityId) -> Result<Option<&Entity>, QueryError> {
    require(model, id)?;
    Ok(model.type_of(id).and_then(|t| model.entity(t)))
}

/// Instances of a type object.
pub fn get_types(model: &Model, type_id: EntityId) -> Result<Vec<&Entity>, QueryError> {
    require(model, type_id)?;
    Ok(entities(model, model.instances_of(type_id)))
}

pub fn get_references(
    model: &Model,
    id: EntityId,
) -> Result<Vec<ClassificationReference>, QueryError> {
    require(model, id)?;
    Ok(model.references_of(id).to_vec())
}

/// The system a reference belongs to.
#[must_use]
pub fn get_classification<'m>(
    model: &'m Model,
    reference: &ClassificationReference,
) -> Option<&'m Classification> {
    model
        .classifications()
        .iter()
        .find(|c| c.name == reference.system)
}

/// Distribution systems an element is assigned to.
pub fn get_systems(model: &Model, id: EntityId) -> Result<Vec<&Entity>, QueryError> {
    require(model, id)?;
    Ok(entities(model, model.systems_of(id)))
}

/// How another entity refers to the one being inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// The other entity holds a reference in the named attribute.
    Attribute(String),
    ContainedIn,
    Contains,
    Decomposes,
    IsDecomposedBy,
    TypedBy,
    Types,
    AssignedToSystem,
    Groups,
    PlacedRelativeTo,
    PlacesRelative,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Attribute(name) => write!(f, "attribute {name}"),
            Relation::ContainedIn => f.write_str("contained in"),
            Relation::Contains => f.write_str("contains"),
            Relation::Decomposes => f.write_str("decomposes"),
            Relation::IsDecomposedBy => f.write_str("is decomposed by"),
            Relation::TypedBy => f.write_str("typed by"),
            Relation::Types => f.write_str("types"),
            Relation::AssignedToSystem => f.write_str("assigned to system"),
            Relation::Groups => f.write_str("groups"),
            Relation::PlacedRelativeTo => f.write_str("placed relative to"),
            Relation::PlacesRelative => f.write_str("places relative"),
        }
    }
}

fn refers_to(value: &Value, target: EntityId) -> bool {
    match value {
        Value::Ref(id) => *id == target,
        Value::List(items) => items.iter().any(|v| refers_to(v, target)),
        Value::Map(map) => map.values().any(|v| refers_to(v, target)),
        _ => false,
    }
}

/// Every entity related to `id`, with the kind of relationship.
pub fn get_inverse(model: &Model, id: EntityId) -> Result<Vec<(Relation, &Entity)>, QueryError> {
    require(model, id)?;
    let mut related: Vec<(Relation, EntityId)> = Vec::new();

    if let Some(container) = model.container_of(id) {
        related.push((Relation::ContainedIn, container));
    }
    if let Some(whole) = model.aggregate_of(id) {
        related.push((Relation::Decomposes, whole));
    }
    for &child in model.children_of(id) {
        let kind = if model.aggregate_of(child) == Some(id) {
            Relation::IsDecomposedBy
        } else {
            Relation::Contains
        };
        related.push((kind, child));
    }
    if let Some(type_id) = model.type_of(id) {
        related.push((Relation::TypedBy, type_id));
    }
    related.extend(model.instances_of(id).iter().map(|i| (Relation::Types, *i)));
    related.extend(
        model
            .systems_of(id)
            .iter()
            .map(|s| (Relation::AssignedToSystem, *s)),
    );
    related.extend(model.members_of(id).iter().map(|m| (Relation::Groups, *m)));
    if let Some(parent) = model.placement_of(id).and_then(|p| p.relative_to) {
        related.push((Relation::PlacedRelativeTo, parent));
    }

    for entity in model.entities() {
        if model
            .placement_of(entity.id())
            .and_then(|p| p.relative_to)
            == Some(id)
        {
            related.push((Relation::PlacesRelative, entity.id()));
        }
        for (name, value) in entity.attributes() {
            if refers_to(value, id) {
                related.push((Relation::Attribute(name.clone()), entity.id()));
            }
        }
    }

    Ok(related
        .into_iter()
        .filter_map(|(relation, other)| model.entity(other).map(|e| (relation, e)))
        .collect())
}

/// Distinct entity classes used in the model, sorted.
#[must_use]
pub fn entity_types(model: &Model) -> BTreeSet<&str> {
    model.entities().map(Entity::class).collect()
}

/// All attributes plus `id` and `type`.
pub fn get_info(model: &Model, id: EntityId) -> Result<BTreeMap<String, Value>, QueryError> {
    let entity = require(model, id)?;
    let mut info = entity.attributes().clone();
    info.insert(
        "id".to_string(),
        i64::try_from(id.0).map_or(Value::Ref(id), Value::Integer),
    );
    info.insert("type".to_string(), Value::from(entity.class()));
    Ok(info)
}

/// Resolve a single attribute path, e.g. `type.Name`.
///
/// Several resolved values come back as a list; an absent path is `None`.
pub fn get_element_value(
    model: &Model,
    id: EntityId,
    path: &str,
    type_fallback: bool,
) -> Result<Option<Value>, QueryError> {
    let entity = require(model, id)?;
    let segments = parse_path(path)?;
    let mut values = resolve_path(model, entity, &segments, type_fallback)?;
    Ok(match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::List(values)),
    })
}
