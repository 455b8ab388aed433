//! # bim-query
//!
//! Element query and traversal over an in-memory building model graph.
//!
//! ## Features
//!
//! - Entity graph with IFC-style classes, attributes and relationships
//!   (containment, aggregation, typing, property sets, materials,
//!   classification, systems, placements)
//! - Selector expressions such as `IfcDoor, IfcWindow, material=Holz`
//! - Container, decomposition and world placement traversal with cycle checks
//! - Property sets with optional inheritance from the type object
//! - JSON snapshots of the model, CSV and JSON export of results
//!
//! ## Example
//!
//! ```
//! use bim_query::model::{Model, Placement};
//! use bim_query::query::{get_container, resolve_world_placement, select_str};
//!
//! let mut model = Model::new("IFC4");
//! let storey = model.add_entity("IfcBuildingStorey");
//! let door = model.add_entity("IfcDoor");
//! model.set_attribute(door, "Name", "Haustuer")?;
//! model.assign_container(door, storey)?;
//! model.associate_material(door, "Holz")?;
//! model.set_placement(door, Placement::identity().at(2.0, 3.0, 5.0).relative_to(storey))?;
//!
//! let doors = select_str(&model, "IfcDoor, material=Holz")?.into_entities()?;
//! assert_eq!(doors.len(), 1);
//! assert_eq!(get_container(&model, door)?.map(|s| s.id()), Some(storey));
//!
//! let world = resolve_world_placement(&model, door)?;
//! assert_eq!(world[(0, 3)], 2.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod snapshot;
