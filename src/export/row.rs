use serde::Serialize;

use crate::error::QueryError;
use crate::model::{Entity, Model};
use crate::query::get_container;

/// One selected entity as written by the exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub id: u64,
    pub class: String,
    pub name: String,
    pub global_id: String,
    pub container: Option<String>,
}

impl ResultRow {
    pub fn from_entity(model: &Model, entity: &Entity) -> Result<Self, QueryError> {
        let container = get_container(model, entity.id())?.map(Entity::label);
        Ok(Self {
            id: entity.id().0,
            class: entity.class().to_string(),
            name: entity.name().unwrap_or_default().to_string(),
            global_id: entity.global_id().unwrap_or_default().to_string(),
            container,
        })
    }

    pub fn collect(model: &Model, entities: &[&Entity]) -> Result<Vec<Self>, QueryError> {
        entities
            .iter()
            .map(|entity| Self::from_entity(model, entity))
            .collect()
    }
}
