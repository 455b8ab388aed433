use std::collections::HashMap;
use tracing::debug;

use super::{
    schema, Classification, ClassificationReference, Entity, EntityId, Placement, PropertySet,
    Value,
};
use crate::error::ModelError;

/// Relationship store, indexed in both directions.
#[derive(Debug, Default, Clone)]
pub(crate) struct Relations {
    pub container: HashMap<EntityId, EntityId>, // element → spatial container
    pub aggregate: HashMap<EntityId, EntityId>, // part → whole
    pub children: HashMap<EntityId, Vec<EntityId>>, // container/whole → contained + parts
    pub typed_by: HashMap<EntityId, EntityId>,  // instance → type object
    pub instances: HashMap<EntityId, Vec<EntityId>>, // type object → instances
    pub property_sets: HashMap<EntityId, Vec<PropertySet>>,
    pub materials: HashMap<EntityId, Vec<String>>,
    pub references: HashMap<EntityId, Vec<ClassificationReference>>,
    pub systems: HashMap<EntityId, Vec<EntityId>>, // element → systems
    pub members: HashMap<EntityId, Vec<EntityId>>, // system → elements
    pub placements: HashMap<EntityId, Placement>,
}

fn detach(lists: &mut HashMap<EntityId, Vec<EntityId>>, owner: EntityId, item: EntityId) {
    if let Some(list) = lists.get_mut(&owner) {
        list.retain(|id| *id != item);
    }
}

/// In-memory building model: entities plus the relationships between them.
///
/// Entities keep insertion order. Queries go through [`crate::query`] with a
/// shared borrow; edits need `&mut Model`.
#[derive(Debug, Default, Clone)]
pub struct Model {
    schema: String,
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    // `None` once an entity took id `u64::MAX`.
    next_id: Option<u64>,
    pub(crate) relations: Relations,
    classifications: Vec<Classification>,
}

impl Model {
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            next_id: Some(1),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    // ---- authoring ----

    /// Create an entity with the next free id.
    ///
    /// Ids count up from the highest id seen so far. Once `u64::MAX` is taken
    /// the lowest unused id is handed out instead.
    pub fn add_entity(&mut self, class: impl Into<String>) -> EntityId {
        let id = match self.next_id {
            Some(next) => EntityId(next.max(1)),
            None => self.lowest_free_id(),
        };
        self.insert(Entity::new(id, class));
        id
    }

    fn lowest_free_id(&self) -> EntityId {
        // Terminates: the model holds far fewer than u64::MAX entities.
        let mut candidate = 1;
        while self.contains(EntityId(candidate)) {
            candidate += 1;
        }
        EntityId(candidate)
    }

    /// Create an entity with a caller-chosen id.
    pub fn add_entity_with_id(
        &mut self,
        id: EntityId,
        class: impl Into<String>,
    ) -> Result<EntityId, ModelError> {
        if self.contains(id) {
            return Err(ModelError::DuplicateId { id });
        }
        self.insert(Entity::new(id, class));
        Ok(id)
    }

    pub(crate) fn insert_entity(&mut self, entity: Entity) -> Result<EntityId, ModelError> {
        let id = entity.id();
        if self.contains(id) {
            return Err(ModelError::DuplicateId { id });
        }
        self.insert(entity);
        Ok(id)
    }

    fn insert(&mut self, entity: Entity) {
        let id = entity.id();
        self.next_id = match (self.next_id, id.0.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, ModelError> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.entities[i]),
            None => Err(ModelError::UnknownEntity { id }),
        }
    }

    fn require(&self, id: EntityId) -> Result<&Entity, ModelError> {
        self.entity(id).ok_or(ModelError::UnknownEntity { id })
    }

    fn require_role(
        &self,
        id: EntityId,
        role: &'static str,
        check: fn(&str) -> bool,
    ) -> Result<(), ModelError> {
        let entity = self.require(id)?;
        if check(entity.class()) {
            Ok(())
        } else {
            Err(ModelError::InvalidRole {
                id,
                class: entity.class().to_string(),
                role,
            })
        }
    }

    pub fn set_attribute(
        &mut self,
        id: EntityId,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        self.entity_mut(id)?
            .attributes_mut()
            .insert(name.into(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: EntityId, name: &str) -> Result<Option<Value>, ModelError> {
        Ok(self.entity_mut(id)?.attributes_mut().remove(name))
    }

    /// Place `element` in a spatial container, replacing any previous one.
    pub fn assign_container(
        &mut self,
        element: EntityId,
        container: EntityId,
    ) -> Result<(), ModelError> {
        self.require(element)?;
        self.require_role(container, "spatial container", schema::is_spatial)?;
        if let Some(previous) = self.relations.container.insert(element, container) {
            detach(&mut self.relations.children, previous, element);
        }
        self.relations
            .children
            .entry(container)
            .or_default()
            .push(element);
        debug!(%element, %container, "assigned container");
        Ok(())
    }

    /// Make `part` a component of `whole` (site in project, storey in
    /// building, ...), replacing any previous whole.
    pub fn aggregate(&mut self, whole: EntityId, part: EntityId) -> Result<(), ModelError> {
        self.require(whole)?;
        self.require(part)?;
        if let Some(previous) = self.relations.aggregate.insert(part, whole) {
            detach(&mut self.relations.children, previous, part);
        }
        self.relations.children.entry(whole).or_default().push(part);
        Ok(())
    }

    pub fn assign_type(&mut self, instance: EntityId, type_object: EntityId) -> Result<(), ModelError> {
        self.require(instance)?;
        self.require_role(type_object, "type object", schema::is_type_object)?;
        if let Some(previous) = self.relations.typed_by.insert(instance, type_object) {
            detach(&mut self.relations.instances, previous, instance);
        }
        self.relations
            .instances
            .entry(type_object)
            .or_default()
            .push(instance);
        Ok(())
    }

    /// Attach a property set. A set with the same name is replaced.
    pub fn add_property_set(&mut self, id: EntityId, pset: PropertySet) -> Result<(), ModelError> {
        self.require(id)?;
        let sets = self.relations.property_sets.entry(id).or_default();
        match sets.iter_mut().find(|existing| existing.name == pset.name) {
            Some(existing) => *existing = pset,
            None => sets.push(pset),
        }
        Ok(())
    }

    pub fn associate_material(
        &mut self,
        id: EntityId,
        material: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.require(id)?;
        let material = material.into();
        let materials = self.relations.materials.entry(id).or_default();
        if !materials.contains(&material) {
            materials.push(material);
        }
        Ok(())
    }

    /// Register a classification system. Re-registering a name replaces it.
    pub fn add_classification(&mut self, classification: Classification) {
        match self
            .classifications
            .iter_mut()
            .find(|c| c.name == classification.name)
        {
            Some(existing) => *existing = classification,
            None => self.classifications.push(classification),
        }
    }

    /// Assign a classification reference. The system is registered on
    /// first use.
    pub fn classify(
        &mut self,
        id: EntityId,
        reference: ClassificationReference,
    ) -> Result<(), ModelError> {
        self.require(id)?;
        if !self.classifications.iter().any(|c| c.name == reference.system) {
            self.classifications
                .push(Classification::new(reference.system.clone()));
        }
        self.relations.references.entry(id).or_default().push(reference);
        Ok(())
    }

    pub fn assign_system(&mut self, element: EntityId, system: EntityId) -> Result<(), ModelError> {
        self.require(element)?;
        self.require_role(system, "system", schema::is_system)?;
        let systems = self.relations.systems.entry(element).or_default();
        if !systems.contains(&system) {
            systems.push(system);
            self.relations.members.entry(system).or_default().push(element);
        }
        Ok(())
    }

    pub fn set_placement(&mut self, id: EntityId, placement: Placement) -> Result<(), ModelError> {
        self.require(id)?;
        if let Some(parent) = placement.relative_to {
            self.require(parent)?;
        }
        self.relations.placements.insert(id, placement);
        Ok(())
    }

    /// Shallow copy: same class and attributes under a fresh id. No
    /// relationships are copied.
    pub fn copy_entity(&mut self, id: EntityId) -> Result<EntityId, ModelError> {
        let source = self.require(id)?;
        let class = source.class().to_string();
        let attributes = source.attributes().clone();
        let copy = self.add_entity(class);
        *self.entity_mut(copy)?.attributes_mut() = attributes;
        debug!(source = %id, %copy, "copied entity");
        Ok(copy)
    }

    /// Copy with relationships: the type, property sets, materials,
    /// classification, systems, container and placement follow the copy.
    /// Parts and contained elements stay with the original.
    pub fn copy_class(&mut self, id: EntityId) -> Result<EntityId, ModelError> {
        let copy = self.copy_entity(id)?;

        if let Some(type_object) = self.type_of(id) {
            self.assign_type(copy, type_object)?;
        }
        let psets = self.property_sets_of(id).to_vec();
        for pset in psets {
            self.add_property_set(copy, pset)?;
        }
        let materials = self.materials_of(id).to_vec();
        for material in materials {
            self.associate_material(copy, material)?;
        }
        let references = self.references_of(id).to_vec();
        for reference in references {
            self.classify(copy, reference)?;
        }
        let systems = self.systems_of(id).to_vec();
        for system in systems {
            self.assign_system(copy, system)?;
        }
        if let Some(container) = self.container_of(id) {
            self.assign_container(copy, container)?;
        }
        if let Some(placement) = self.placement_of(id).cloned() {
            self.set_placement(copy, placement)?;
        }
        Ok(copy)
    }

    // ---- raw relationship access for the query layer ----

    pub(crate) fn container_of(&self, id: EntityId) -> Option<EntityId> {
        self.relations.container.get(&id).copied()
    }

    pub(crate) fn aggregate_of(&self, id: EntityId) -> Option<EntityId> {
        self.relations.aggregate.get(&id).copied()
    }

    pub(crate) fn children_of(&self, id: EntityId) -> &[EntityId] {
        self.relations.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn type_of(&self, id: EntityId) -> Option<EntityId> {
        self.relations.typed_by.get(&id).copied()
    }

    pub(crate) fn instances_of(&self, id: EntityId) -> &[EntityId] {
        self.relations.instances.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn property_sets_of(&self, id: EntityId) -> &[PropertySet] {
        self.relations.property_sets.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn materials_of(&self, id: EntityId) -> &[String] {
        self.relations.materials.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn references_of(&self, id: EntityId) -> &[ClassificationReference] {
        self.relations.references.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn systems_of(&self, id: EntityId) -> &[EntityId] {
        self.relations.systems.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn members_of(&self, id: EntityId) -> &[EntityId] {
        self.relations.members.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn placement_of(&self, id: EntityId) -> Option<&Placement> {
        self.relations.placements.get(&id)
    }
}
