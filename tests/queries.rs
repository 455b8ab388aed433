mod common;

use approx::assert_relative_eq;
use nalgebra::Vector3;
use pretty_assertions::assert_eq;

use bim_query::error::QueryError;
use bim_query::model::{placement::translation_of, Entity, EntityId, Model, Placement, Value};
use bim_query::query::{self, Query};

fn ids(entities: &[&Entity]) -> Vec<EntityId> {
    entities.iter().map(|e| e.id()).collect()
}

fn select_ids(model: &Model, expression: &str) -> Vec<EntityId> {
    let found = query::select_str(model, expression)
        .unwrap()
        .into_entities()
        .unwrap();
    ids(&found)
}

fn select_inherited(model: &Model, expression: &str) -> Vec<EntityId> {
    let selector = Query::parse(expression).unwrap().with_type_fallback(true);
    let found = query::select(model, &selector)
        .unwrap()
        .into_entities()
        .unwrap();
    ids(&found)
}

#[test]
fn wooden_doors_and_windows() {
    let (model, haus) = common::haus();
    let found = select_ids(&model, "IfcDoor, IfcWindow, material=Holz");
    assert_eq!(
        found,
        vec![haus.wooden_doors[0], haus.wooden_doors[1], haus.wooden_window]
    );
}

#[test]
fn every_selected_entity_has_a_requested_type() {
    let (model, _) = common::haus();
    for expression in ["IfcWall", "IfcDoor, IfcWindow", "IfcBuildingElement", "IfcProduct"] {
        let selector = Query::parse(expression).unwrap();
        for entity in query::select(&model, &selector).unwrap() {
            let entity = entity.unwrap();
            assert!(
                selector.types.iter().any(|class| entity.is_a(class)),
                "{entity} does not match {expression}"
            );
        }
    }
}

#[test]
fn subtypes_and_case_insensitive_tags() {
    let (model, haus) = common::haus();
    assert_eq!(select_ids(&model, "IfcWall"), haus.walls);
    assert_eq!(select_ids(&model, "IFCWALL"), haus.walls);
    assert_eq!(select_ids(&model, "IfcDistributionSystem"), vec![haus.water_system]);
}

#[test]
fn direct_attribute_match() {
    let (model, haus) = common::haus();
    assert_eq!(
        select_ids(&model, "IfcWallType, Description=Aussenwand"),
        vec![haus.wall_type]
    );
    assert_eq!(
        select_ids(&model, "IfcWall, Name=Wand-Ext-1"),
        vec![haus.walls[1]]
    );
    assert_eq!(
        select_ids(&model, r#"IfcDoor, Name *= "Holz""#),
        haus.wooden_doors
    );
}

#[test]
fn type_fallback_is_opt_in() {
    let (model, haus) = common::haus();
    assert!(select_ids(&model, "IfcWall, Description=Aussenwand").is_empty());
    assert_eq!(
        select_inherited(&model, "IfcWall, Description=Aussenwand"),
        haus.walls
    );
}

#[test]
fn present_but_empty_instance_value_blocks_fallback() {
    let mut model = Model::new("IFC4");
    let wall_type = model.add_entity("IfcWallType");
    model
        .set_attribute(wall_type, "Tags", Value::List(vec!["A".into()]))
        .unwrap();
    let tagged = model.add_entity("IfcWall");
    model.assign_type(tagged, wall_type).unwrap();
    let emptied = model.add_entity("IfcWall");
    model.set_attribute(emptied, "Tags", Value::List(Vec::new())).unwrap();
    model.assign_type(emptied, wall_type).unwrap();

    assert_eq!(select_inherited(&model, "IfcWall, Tags=A"), vec![tagged]);
}

#[test]
fn instance_property_overrides_type_property() {
    let (model, haus) = common::haus();
    assert_eq!(
        select_ids(&model, "IfcWall, Pset_WallCommon.FireRating=REI90"),
        vec![haus.walls[0]]
    );
    assert!(select_ids(&model, "IfcWall, Pset_WallCommon.FireRating=REI60").is_empty());
    assert_eq!(
        select_inherited(&model, "IfcWall, Pset_WallCommon.FireRating=REI60"),
        vec![haus.walls[1], haus.walls[2]]
    );
    assert_eq!(
        select_inherited(&model, "IfcWall, Pset_WallCommon.IsExternal=true"),
        haus.walls
    );
}

#[test]
fn type_prefix_and_container_prefix() {
    let (model, haus) = common::haus();
    assert_eq!(
        select_ids(&model, "IfcDoor, type.Name=Tuer-1-flg"),
        vec![haus.wooden_doors[0], haus.wooden_doors[1], haus.metal_door]
    );
    assert_eq!(
        select_ids(&model, "IfcDoor, container.Name=Dachgeschoss"),
        vec![haus.metal_door]
    );
}

#[test]
fn negated_comparators_need_a_value() {
    let (model, haus) = common::haus();
    assert_eq!(select_ids(&model, "IfcDoor, material!=Holz"), vec![haus.metal_door]);
    // Only the walls carry a GlobalId.
    assert_eq!(
        select_ids(&model, "IfcBuildingElement, GlobalId!=nothing"),
        haus.walls
    );
    assert_eq!(
        select_ids(&model, "IfcWall, Name!*=Ext-2"),
        vec![haus.walls[0], haus.walls[1]]
    );
}

#[test]
fn numeric_comparison() {
    let (model, haus) = common::haus();
    assert_eq!(
        select_ids(&model, "IfcBuildingStorey, Elevation>1"),
        vec![haus.roof_floor]
    );
    assert_eq!(
        select_ids(&model, "IfcBuildingStorey, Elevation=2.70"),
        vec![haus.roof_floor]
    );
    assert_eq!(
        select_ids(&model, "IfcBuildingStorey, Elevation<=0"),
        vec![haus.ground_floor]
    );
}

#[test]
fn scope_limits_to_a_container_subtree() {
    let (model, haus) = common::haus();
    let expression = format!("IfcDoor, @{}", haus.ground_floor);
    assert_eq!(select_ids(&model, &expression), haus.wooden_doors);

    let expression = format!("IfcWall, @{}", haus.building);
    assert_eq!(select_ids(&model, &expression), haus.walls);
}

#[test]
fn malformed_queries_are_rejected() {
    let model = Model::new("IFC4");
    for expression in ["", "material=Holz", "IfcDoor, =x", "IfcDoor, type..Name=x"] {
        let err = query::select_str(&model, expression).err();
        assert!(
            matches!(err, Some(QueryError::MalformedQuery { .. })),
            "{expression:?} gave {err:?}"
        );
    }
}

#[test]
fn container_of_wall_and_chain() {
    let (model, haus) = common::haus();
    let container = query::get_container(&model, haus.walls[0]).unwrap().unwrap();
    assert_eq!(container.id(), haus.ground_floor);
    assert_eq!(container.name(), Some("Erdgeschoss"));

    let chain = query::container_chain(&model, haus.walls[0]).unwrap();
    assert_eq!(
        ids(&chain),
        vec![haus.ground_floor, haus.building, haus.site, haus.project]
    );
    assert!(query::get_container(&model, haus.project).unwrap().is_none());
}

#[test]
fn cyclic_containment_is_an_error() {
    let mut model = Model::new("IFC4");
    let a = model.add_entity("IfcBuildingStorey");
    let b = model.add_entity("IfcBuildingStorey");
    model.assign_container(a, b).unwrap();
    model.assign_container(b, a).unwrap();

    let err = query::get_container(&model, a).unwrap_err();
    assert_eq!(
        err,
        QueryError::CyclicGraph {
            relation: "containment",
            start: a,
            repeated: a,
        }
    );

    let scoped = format!("IfcBuildingStorey, @{b}");
    let first = query::select_str(&model, &scoped).unwrap().next();
    assert!(matches!(first, Some(Err(QueryError::CyclicGraph { .. }))));
}

#[test]
fn decomposition_round_trip() {
    let (model, haus) = common::haus();
    for container in [haus.ground_floor, haus.roof_floor] {
        let children = query::get_decomposition(&model, container).unwrap();
        assert!(!children.is_empty());
        for child in children {
            let back = query::get_container(&model, child.id()).unwrap().unwrap();
            assert_eq!(back.id(), container);
        }
    }

    let ground = query::get_decomposition(&model, haus.ground_floor).unwrap();
    assert_eq!(
        ids(&ground),
        vec![
            haus.walls[0],
            haus.walls[1],
            haus.wooden_doors[0],
            haus.wooden_doors[1],
            haus.pipe,
        ]
    );
}

#[test]
fn aggregation_parts() {
    let (model, haus) = common::haus();
    let parts = query::get_parts(&model, haus.building).unwrap();
    assert_eq!(ids(&parts), vec![haus.ground_floor, haus.roof_floor]);
    let whole = query::get_aggregate(&model, haus.site).unwrap().unwrap();
    assert_eq!(whole.id(), haus.project);
}

#[test]
fn storey_offset_reaches_the_wall() {
    let mut model = Model::new("IFC4");
    let storey = model.add_entity("IfcBuildingStorey");
    let wall = model.add_entity("IfcWall");
    model.assign_container(wall, storey).unwrap();
    model
        .set_placement(storey, Placement::identity().at(2.0, 3.0, 5.0))
        .unwrap();
    model
        .set_placement(wall, Placement::identity().relative_to(storey))
        .unwrap();

    let world = query::resolve_world_placement(&model, wall).unwrap();
    assert_relative_eq!(translation_of(&world), Vector3::new(2.0, 3.0, 5.0));
}

#[test]
fn rotated_wall_on_upper_storey() {
    let (model, haus) = common::haus();
    let world = query::resolve_world_placement(&model, haus.walls[2]).unwrap();
    assert_relative_eq!(
        translation_of(&world),
        Vector3::new(2.0, 0.0, 2.7),
        epsilon = 1e-12
    );
    // 180 degrees about Z flips the local X axis.
    assert_relative_eq!(world[(0, 0)], -1.0, epsilon = 1e-12);

    let unplaced = query::resolve_world_placement(&model, haus.pipe).unwrap();
    assert_relative_eq!(unplaced, nalgebra::Matrix4::<f64>::identity());
}

#[test]
fn property_sets_with_inheritance() {
    let (model, haus) = common::haus();
    let own = query::get_property_sets(&model, haus.walls[0], false).unwrap();
    assert_eq!(
        own["Pset_WallCommon"].get("FireRating"),
        Some(&Value::from("REI90"))
    );
    assert_eq!(own["Pset_WallCommon"].get("IsExternal"), None);

    let merged = query::get_property_sets(&model, haus.walls[0], true).unwrap();
    assert_eq!(
        merged["Pset_WallCommon"].get("FireRating"),
        Some(&Value::from("REI90"))
    );
    assert_eq!(
        merged["Pset_WallCommon"].get("IsExternal"),
        Some(&Value::Boolean(true))
    );

    let other = query::get_property_sets(&model, haus.walls[1], true).unwrap();
    assert_eq!(
        other["Pset_WallCommon"].get("FireRating"),
        Some(&Value::from("REI60"))
    );
}

#[test]
fn types_and_instances() {
    let (model, haus) = common::haus();
    let wall_type = query::get_type(&model, haus.walls[1]).unwrap().unwrap();
    assert_eq!(wall_type.id(), haus.wall_type);
    let instances = query::get_types(&model, haus.wall_type).unwrap();
    assert_eq!(ids(&instances), haus.walls);
    assert!(query::get_type(&model, haus.wooden_window).unwrap().is_none());
}

#[test]
fn copied_door_joins_type_and_storey() {
    let (mut model, haus) = common::haus();
    let copy = model.copy_class(haus.metal_door).unwrap();

    let instances = query::get_types(&model, haus.door_type).unwrap();
    assert_eq!(ids(&instances).last(), Some(&copy));
    let children = query::get_decomposition(&model, haus.roof_floor).unwrap();
    assert!(ids(&children).contains(&copy));
    assert_eq!(
        select_ids(&model, "IfcDoor, material=Stahl"),
        vec![haus.metal_door, copy]
    );

    let shallow = model.copy_entity(haus.metal_door).unwrap();
    assert!(query::get_container(&model, shallow).unwrap().is_none());
}

#[test]
fn classification_and_systems() {
    let (model, haus) = common::haus();
    let references = query::get_references(&model, haus.metal_door).unwrap();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].identification, "Pr_30_59_24_52");
    let system = query::get_classification(&model, &references[0]).unwrap();
    assert_eq!(system.name, "Uniclass 2015");

    assert_eq!(
        select_ids(&model, "IfcDoor, classification=Pr_30_59_24_52"),
        vec![haus.metal_door]
    );

    let systems = query::get_systems(&model, haus.pipe).unwrap();
    assert_eq!(ids(&systems), vec![haus.water_system]);
}

#[test]
fn element_value_paths() {
    let (model, haus) = common::haus();
    assert_eq!(
        query::get_element_value(&model, haus.walls[0], "type.Name", false).unwrap(),
        Some(Value::from("Wand-Ext-24"))
    );
    assert_eq!(
        query::get_element_value(&model, haus.walls[0], "container.Elevation", false).unwrap(),
        Some(Value::Real(0.0))
    );
    assert_eq!(
        query::get_element_value(&model, haus.walls[0], "Description", true).unwrap(),
        Some(Value::from("Aussenwand"))
    );
    assert_eq!(
        query::get_element_value(&model, EntityId(999), "Name", false).unwrap_err(),
        QueryError::UnknownEntity { id: EntityId(999) }
    );
}

#[test]
fn query_text_round_trips() {
    let selector = Query::parse(r#"IfcDoor, IfcWindow, material=Holz, Name *= "Tuer, 1""#).unwrap();
    let reparsed = Query::parse(&selector.to_string()).unwrap();
    assert_eq!(reparsed, selector);
}
