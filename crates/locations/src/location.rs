use serde::{Deserialize, Serialize};

use shipquote_core::{Entity, LocationId};

/// Geographic granularity of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Everywhere,
    Continent,
    Country,
    Region,
}

/// Node of the location tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<LocationId>,
    pub kind: LocationKind,
}

impl Location {
    pub fn new(
        id: LocationId,
        name: impl Into<String>,
        parent: Option<LocationId>,
        kind: LocationKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            kind,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }
}
