#![allow(dead_code)]

use bim_query::model::{
    Axis, ClassificationReference, EntityId, Model, Placement, PropertySet,
};

/// Ids of the sample house built by [`haus`].
pub struct Haus {
    pub project: EntityId,
    pub site: EntityId,
    pub building: EntityId,
    pub ground_floor: EntityId,
    pub roof_floor: EntityId,
    pub wall_type: EntityId,
    pub door_type: EntityId,
    pub walls: Vec<EntityId>,
    pub wooden_doors: Vec<EntityId>,
    pub metal_door: EntityId,
    pub wooden_window: EntityId,
    pub pipe: EntityId,
    pub water_system: EntityId,
}

/// A small two-storey house: project → site → building → storeys, walls
/// typed by a wall type, doors and windows with materials.
pub fn haus() -> (Model, Haus) {
    let mut model = Model::new("IFC4");

    let project = named(&mut model, "IfcProject", "Projekt-FZK-Haus");
    let site = named(&mut model, "IfcSite", "Gelaende");
    let building = named(&mut model, "IfcBuilding", "FZK-Haus");
    let ground_floor = named(&mut model, "IfcBuildingStorey", "Erdgeschoss");
    let roof_floor = named(&mut model, "IfcBuildingStorey", "Dachgeschoss");
    model.set_attribute(ground_floor, "Elevation", 0.0).unwrap();
    model.set_attribute(roof_floor, "Elevation", 2.7).unwrap();

    model.aggregate(project, site).unwrap();
    model.aggregate(site, building).unwrap();
    model.aggregate(building, ground_floor).unwrap();
    model.aggregate(building, roof_floor).unwrap();

    model.set_placement(site, Placement::identity()).unwrap();
    model
        .set_placement(building, Placement::identity().relative_to(site))
        .unwrap();
    model
        .set_placement(ground_floor, Placement::identity().relative_to(building))
        .unwrap();
    model
        .set_placement(
            roof_floor,
            Placement::identity().at(0.0, 0.0, 2.7).relative_to(building),
        )
        .unwrap();

    let wall_type = named(&mut model, "IfcWallType", "Wand-Ext-24");
    model.set_attribute(wall_type, "Description", "Aussenwand").unwrap();
    model
        .add_property_set(
            wall_type,
            PropertySet::new("Pset_WallCommon")
                .with("IsExternal", true)
                .with("FireRating", "REI60"),
        )
        .unwrap();

    let mut walls = Vec::new();
    for (i, storey) in [ground_floor, ground_floor, roof_floor].into_iter().enumerate() {
        let wall = named(&mut model, "IfcWallStandardCase", &format!("Wand-Ext-{i}"));
        model
            .set_attribute(wall, "GlobalId", format!("2XPyKWY018sA1ygZKgQP0{i}"))
            .unwrap();
        model.assign_container(wall, storey).unwrap();
        model.assign_type(wall, wall_type).unwrap();
        model.associate_material(wall, "Ziegel").unwrap();
        model
            .set_placement(
                wall,
                Placement::identity()
                    .with_rotation(90.0 * i as f64, Axis::Z)
                    .at(i as f64, 0.0, 0.0)
                    .relative_to(storey),
            )
            .unwrap();
        walls.push(wall);
    }
    model
        .add_property_set(
            walls[0],
            PropertySet::new("Pset_WallCommon").with("FireRating", "REI90"),
        )
        .unwrap();

    let door_type = named(&mut model, "IfcDoorType", "Tuer-1-flg");
    let mut wooden_doors = Vec::new();
    for i in 0..2 {
        let door = named(&mut model, "IfcDoor", &format!("Tuer-Holz-{i}"));
        model.assign_container(door, ground_floor).unwrap();
        model.assign_type(door, door_type).unwrap();
        model.associate_material(door, "Holz").unwrap();
        wooden_doors.push(door);
    }
    let metal_door = named(&mut model, "IfcDoor", "Tuer-Stahl");
    model.assign_container(metal_door, roof_floor).unwrap();
    model.assign_type(metal_door, door_type).unwrap();
    model.associate_material(metal_door, "Stahl").unwrap();
    model
        .classify(
            metal_door,
            ClassificationReference::new("Pr_30_59_24_52", "Uniclass 2015").named("Steel doorsets"),
        )
        .unwrap();

    let wooden_window = named(&mut model, "IfcWindow", "Fenster-Holz");
    model.assign_container(wooden_window, roof_floor).unwrap();
    model.associate_material(wooden_window, "Holz").unwrap();

    let water_system = named(&mut model, "IfcDistributionSystem", "Trinkwasser");
    let pipe = named(&mut model, "IfcPipeSegment", "Rohr-1");
    model.assign_container(pipe, ground_floor).unwrap();
    model.assign_system(pipe, water_system).unwrap();

    let ids = Haus {
        project,
        site,
        building,
        ground_floor,
        roof_floor,
        wall_type,
        door_type,
        walls,
        wooden_doors,
        metal_door,
        wooden_window,
        pipe,
        water_system,
    };
    (model, ids)
}

fn named(model: &mut Model, class: &str, name: &str) -> EntityId {
    let id = model.add_entity(class);
    model.set_attribute(id, "Name", name).unwrap();
    id
}
