//! IFC4 class hierarchy used for `is_a` checks.
//!
//! Only the classes relevant to building queries are listed. Class names
//! compare case-insensitively so STEP tags (`IFCWALL`) and schema names
//! (`IfcWall`) are interchangeable.

// (class, supertype)
const SUPERTYPES: &[(&str, &str)] = &[
    // Roots
    ("IfcObjectDefinition", "IfcRoot"),
    ("IfcObject", "IfcObjectDefinition"),
    ("IfcContext", "IfcObjectDefinition"),
    ("IfcProject", "IfcContext"),
    ("IfcProduct", "IfcObject"),
    ("IfcGroup", "IfcObject"),
    // Systems
    ("IfcSystem", "IfcGroup"),
    ("IfcDistributionSystem", "IfcSystem"),
    ("IfcDistributionCircuit", "IfcDistributionSystem"),
    ("IfcBuildingSystem", "IfcSystem"),
    ("IfcZone", "IfcSystem"),
    // Spatial structure
    ("IfcSpatialElement", "IfcProduct"),
    ("IfcSpatialStructureElement", "IfcSpatialElement"),
    ("IfcSpatialZone", "IfcSpatialElement"),
    ("IfcExternalSpatialStructureElement", "IfcSpatialElement"),
    ("IfcSite", "IfcSpatialStructureElement"),
    ("IfcBuilding", "IfcSpatialStructureElement"),
    ("IfcBuildingStorey", "IfcSpatialStructureElement"),
    ("IfcSpace", "IfcSpatialStructureElement"),
    // Elements
    ("IfcElement", "IfcProduct"),
    ("IfcBuildingElement", "IfcElement"),
    ("IfcWall", "IfcBuildingElement"),
    ("IfcWallStandardCase", "IfcWall"),
    ("IfcWallElementedCase", "IfcWall"),
    ("IfcDoor", "IfcBuildingElement"),
    ("IfcDoorStandardCase", "IfcDoor"),
    ("IfcWindow", "IfcBuildingElement"),
    ("IfcWindowStandardCase", "IfcWindow"),
    ("IfcSlab", "IfcBuildingElement"),
    ("IfcSlabStandardCase", "IfcSlab"),
    ("IfcBeam", "IfcBuildingElement"),
    ("IfcBeamStandardCase", "IfcBeam"),
    ("IfcColumn", "IfcBuildingElement"),
    ("IfcColumnStandardCase", "IfcColumn"),
    ("IfcMember", "IfcBuildingElement"),
    ("IfcPlate", "IfcBuildingElement"),
    ("IfcRoof", "IfcBuildingElement"),
    ("IfcStair", "IfcBuildingElement"),
    ("IfcStairFlight", "IfcBuildingElement"),
    ("IfcRamp", "IfcBuildingElement"),
    ("IfcRailing", "IfcBuildingElement"),
    ("IfcCovering", "IfcBuildingElement"),
    ("IfcCurtainWall", "IfcBuildingElement"),
    ("IfcFooting", "IfcBuildingElement"),
    ("IfcPile", "IfcBuildingElement"),
    ("IfcChimney", "IfcBuildingElement"),
    ("IfcShadingDevice", "IfcBuildingElement"),
    ("IfcBuildingElementProxy", "IfcBuildingElement"),
    ("IfcFurnishingElement", "IfcElement"),
    ("IfcFurniture", "IfcFurnishingElement"),
    ("IfcDistributionElement", "IfcElement"),
    ("IfcDistributionFlowElement", "IfcDistributionElement"),
    ("IfcFlowSegment", "IfcDistributionFlowElement"),
    ("IfcPipeSegment", "IfcFlowSegment"),
    ("IfcDuctSegment", "IfcFlowSegment"),
    ("IfcCableSegment", "IfcFlowSegment"),
    ("IfcFlowTerminal", "IfcDistributionFlowElement"),
    ("IfcFlowFixture", "IfcFlowTerminal"),
    ("IfcSanitaryTerminal", "IfcFlowTerminal"),
    ("IfcLightFixture", "IfcFlowTerminal"),
    ("IfcAirTerminal", "IfcFlowTerminal"),
    ("IfcFeatureElement", "IfcElement"),
    ("IfcFeatureElementSubtraction", "IfcFeatureElement"),
    ("IfcOpeningElement", "IfcFeatureElementSubtraction"),
    // Type objects
    ("IfcTypeObject", "IfcObjectDefinition"),
    ("IfcTypeProduct", "IfcTypeObject"),
    ("IfcDoorStyle", "IfcTypeProduct"),
    ("IfcWindowStyle", "IfcTypeProduct"),
    ("IfcElementType", "IfcTypeProduct"),
    ("IfcBuildingElementType", "IfcElementType"),
    ("IfcWallType", "IfcBuildingElementType"),
    ("IfcDoorType", "IfcBuildingElementType"),
    ("IfcWindowType", "IfcBuildingElementType"),
    ("IfcSlabType", "IfcBuildingElementType"),
    ("IfcBeamType", "IfcBuildingElementType"),
    ("IfcColumnType", "IfcBuildingElementType"),
    ("IfcMemberType", "IfcBuildingElementType"),
    ("IfcPlateType", "IfcBuildingElementType"),
    ("IfcRoofType", "IfcBuildingElementType"),
    ("IfcStairType", "IfcBuildingElementType"),
    ("IfcStairFlightType", "IfcBuildingElementType"),
    ("IfcRailingType", "IfcBuildingElementType"),
    ("IfcCoveringType", "IfcBuildingElementType"),
    ("IfcCurtainWallType", "IfcBuildingElementType"),
    ("IfcFurnishingElementType", "IfcElementType"),
    ("IfcFurnitureType", "IfcFurnishingElementType"),
    ("IfcDistributionElementType", "IfcElementType"),
    ("IfcDistributionFlowElementType", "IfcDistributionElementType"),
    ("IfcFlowSegmentType", "IfcDistributionFlowElementType"),
    ("IfcPipeSegmentType", "IfcFlowSegmentType"),
    ("IfcFlowTerminalType", "IfcDistributionFlowElementType"),
    ("IfcSanitaryTerminalType", "IfcFlowTerminalType"),
    ("IfcSpatialElementType", "IfcTypeProduct"),
    ("IfcSpatialStructureElementType", "IfcSpatialElementType"),
    ("IfcSpaceType", "IfcSpatialStructureElementType"),
];

/// Supertype of `class`, if the class is known.
#[must_use]
pub fn supertype(class: &str) -> Option<&'static str> {
    SUPERTYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(class))
        .map(|(_, parent)| *parent)
}

/// True if `class` equals `ancestor` or inherits from it.
#[must_use]
pub fn is_a(class: &str, ancestor: &str) -> bool {
    if class.eq_ignore_ascii_case(ancestor) {
        return true;
    }
    let mut current = supertype(class);
    while let Some(parent) = current {
        if parent.eq_ignore_ascii_case(ancestor) {
            return true;
        }
        current = supertype(parent);
    }
    false
}

/// Site, building, storey, space and other spatial elements.
#[must_use]
pub fn is_spatial(class: &str) -> bool {
    is_a(class, "IfcSpatialElement")
}

#[must_use]
pub fn is_type_object(class: &str) -> bool {
    is_a(class, "IfcTypeObject")
}

#[must_use]
pub fn is_system(class: &str) -> bool {
    is_a(class, "IfcSystem")
}
