use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Value;

/// Whether a set holds properties (IfcPropertySet) or quantities
/// (IfcElementQuantity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsetKind {
    #[default]
    Properties,
    Quantities,
}

/// A named group of properties or quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub name: String,
    #[serde(default)]
    pub kind: PsetKind,
    pub properties: BTreeMap<String, Value>,
}

impl PropertySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PsetKind::Properties,
            properties: BTreeMap::new(),
        }
    }

    pub fn quantities(name: impl Into<String>) -> Self {
        Self {
            kind: PsetKind::Quantities,
            ..Self::new(name)
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// pset name → property name → value
pub type PropertyMap = BTreeMap<String, BTreeMap<String, Value>>;

/// Which kinds of sets to return from a property lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PsetFilter {
    #[default]
    All,
    PropertiesOnly,
    QuantitiesOnly,
}

impl PsetFilter {
    #[must_use]
    pub fn accepts(self, kind: PsetKind) -> bool {
        match self {
            PsetFilter::All => true,
            PsetFilter::PropertiesOnly => kind == PsetKind::Properties,
            PsetFilter::QuantitiesOnly => kind == PsetKind::Quantities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_by_kind() {
        assert!(PsetFilter::All.accepts(PsetKind::Quantities));
        assert!(PsetFilter::PropertiesOnly.accepts(PsetKind::Properties));
        assert!(!PsetFilter::PropertiesOnly.accepts(PsetKind::Quantities));
        assert!(!PsetFilter::QuantitiesOnly.accepts(PsetKind::Properties));
    }

    #[test]
    fn builder_collects_properties() {
        let pset = PropertySet::quantities("Qto_WallBaseQuantities")
            .with("Length", 5.0)
            .with("Height", 3.0);
        assert_eq!(pset.kind, PsetKind::Quantities);
        assert_eq!(pset.get("Length"), Some(&Value::Real(5.0)));
        assert_eq!(pset.get("Width"), None);
    }
}
