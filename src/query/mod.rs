pub mod facade;
mod resolve;
pub mod selector;

pub use facade::{
    container_chain, entity_types, get_aggregate, get_classification, get_container,
    get_decomposition, get_element_value, get_info, get_inverse, get_parts, get_property_sets,
    get_property_sets_filtered, get_references, get_systems, get_type, get_types, select,
    select_str, resolve_world_placement, Relation, Selection,
};
pub use selector::{Comparator, Predicate, Query};
