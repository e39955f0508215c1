use serde::{Deserialize, Serialize};

use shipquote_core::{Entity, ShippingMethodId};

/// Named delivery mechanism ("Post", "Courier", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub name: String,
}

impl ShippingMethod {
    pub fn new(id: ShippingMethodId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for ShippingMethod {
    type Id = ShippingMethodId;

    fn id(&self) -> ShippingMethodId {
        self.id
    }
}
