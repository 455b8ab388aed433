//! JSON snapshots of an in-memory [`Model`].
//!
//! This is the crate's own persistence format, not IFC/STEP. Relationships
//! are written in the order they were created so decomposition order
//! survives a round trip.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

use crate::error::SnapshotError;
use crate::model::{
    Classification, ClassificationReference, Entity, EntityId, Model, Placement, PropertySet,
};

/// `relating` owns or groups `related`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub relating: EntityId,
    pub related: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionKind {
    Contains,
    Aggregates,
}

/// One entry of a container's or whole's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposition {
    pub kind: DecompositionKind,
    pub relating: EntityId,
    pub related: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assigned<T> {
    pub entity: EntityId,
    #[serde(flatten)]
    pub item: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLink {
    pub entity: EntityId,
    pub material: String,
}

/// Serialized form of a [`Model`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema: String,
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub decomposition: Vec<Decomposition>,
    #[serde(default)]
    pub typing: Vec<Link>,
    #[serde(default)]
    pub property_sets: Vec<Assigned<PropertySet>>,
    #[serde(default)]
    pub materials: Vec<MaterialLink>,
    #[serde(default)]
    pub classifications: Vec<Classification>,
    #[serde(default)]
    pub references: Vec<Assigned<ClassificationReference>>,
    #[serde(default)]
    pub systems: Vec<Link>,
    #[serde(default)]
    pub placements: Vec<Assigned<Placement>>,
}

impl From<&Model> for Snapshot {
    fn from(model: &Model) -> Self {
        let mut snapshot = Snapshot {
            schema: model.schema().to_string(),
            classifications: model.classifications().to_vec(),
            ..Snapshot::default()
        };

        for entity in model.entities() {
            let id = entity.id();
            snapshot.entities.push(entity.clone());

            for &child in model.children_of(id) {
                let kind = if model.aggregate_of(child) == Some(id) {
                    DecompositionKind::Aggregates
                } else {
                    DecompositionKind::Contains
                };
                snapshot.decomposition.push(Decomposition {
                    kind,
                    relating: id,
                    related: child,
                });
            }
            snapshot.typing.extend(model.instances_of(id).iter().map(|&i| Link {
                relating: id,
                related: i,
            }));
            snapshot
                .systems
                .extend(model.members_of(id).iter().map(|&m| Link {
                    relating: id,
                    related: m,
                }));
            snapshot
                .property_sets
                .extend(model.property_sets_of(id).iter().map(|p| Assigned {
                    entity: id,
                    item: p.clone(),
                }));
            snapshot
                .materials
                .extend(model.materials_of(id).iter().map(|m| MaterialLink {
                    entity: id,
                    material: m.clone(),
                }));
            snapshot
                .references
                .extend(model.references_of(id).iter().map(|r| Assigned {
                    entity: id,
                    item: r.clone(),
                }));
            if let Some(placement) = model.placement_of(id) {
                snapshot.placements.push(Assigned {
                    entity: id,
                    item: placement.clone(),
                });
            }
        }
        snapshot
    }
}

impl TryFrom<Snapshot> for Model {
    type Error = SnapshotError;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        let mut model = Model::new(snapshot.schema);
        for entity in snapshot.entities {
            model.insert_entity(entity)?;
        }
        for classification in snapshot.classifications {
            model.add_classification(classification);
        }
        for entry in snapshot.decomposition {
            match entry.kind {
                DecompositionKind::Contains => {
                    model.assign_container(entry.related, entry.relating)?;
                }
                DecompositionKind::Aggregates => model.aggregate(entry.relating, entry.related)?,
            }
        }
        for link in snapshot.typing {
            model.assign_type(link.related, link.relating)?;
        }
        for link in snapshot.systems {
            model.assign_system(link.related, link.relating)?;
        }
        for assigned in snapshot.property_sets {
            model.add_property_set(assigned.entity, assigned.item)?;
        }
        for link in snapshot.materials {
            model.associate_material(link.entity, link.material)?;
        }
        for assigned in snapshot.references {
            model.classify(assigned.entity, assigned.item)?;
        }
        for assigned in snapshot.placements {
            model.set_placement(assigned.entity, assigned.item)?;
        }
        debug!(entities = model.len(), "model restored from snapshot");
        Ok(model)
    }
}

pub fn read_model<R: Read>(reader: R) -> Result<Model, SnapshotError> {
    let snapshot: Snapshot = serde_json::from_reader(reader)?;
    Model::try_from(snapshot)
}

pub fn write_model<W: Write>(model: &Model, writer: W) -> Result<(), SnapshotError> {
    serde_json::to_writer_pretty(writer, &Snapshot::from(model))?;
    Ok(())
}

/// Load a snapshot file.
///
/// # Errors
///
/// Returns [`SnapshotError::FileRead`] if the file cannot be opened,
/// [`SnapshotError::Json`] if it is not a snapshot, and
/// [`SnapshotError::Model`] if it references missing entities.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model, SnapshotError> {
    let file = File::open(&path).map_err(|source| SnapshotError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    read_model(BufReader::new(file))
}

pub fn save_model<P: AsRef<Path>>(model: &Model, path: P) -> Result<(), SnapshotError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| SnapshotError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_model(model, &mut writer)?;
    writer.flush().map_err(|source| SnapshotError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    Ok(())
}
