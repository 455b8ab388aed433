use serde::{Deserialize, Serialize};

/// A classification system such as Uniclass 2015.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Classification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edition: None,
            source: None,
        }
    }
}

/// A code from a classification system assigned to an entity,
/// e.g. `Pr_30_59_99_02` in "Uniclass 2015".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReference {
    pub identification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of the owning [`Classification`].
    pub system: String,
}

impl ClassificationReference {
    pub fn new(identification: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            identification: identification.into(),
            name: None,
            system: system.into(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
