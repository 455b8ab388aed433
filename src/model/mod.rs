pub mod classification;
pub mod entity;
pub mod graph;
pub mod placement;
pub mod properties;
pub mod schema;

pub use classification::{Classification, ClassificationReference};
pub use entity::{AttributeSource, Entity, EntityId, Value};
pub use graph::Model;
pub use placement::{Axis, Placement};
pub use properties::{PropertyMap, PropertySet, PsetFilter, PsetKind};
