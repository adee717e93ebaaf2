use serde::{Deserialize, Serialize};

use super::Fixture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Approved,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [Self; 3] = [Self::Placed, Self::Approved, Self::Delivered];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Approved => "approved",
            Self::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape: `id, petId, quantity, shipDate, status, complete`.
///
/// `pet_id` is a plain reference; nothing checks that the pet exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(rename = "petId")]
    pub pet_id: i64,
    pub quantity: i64,
    /// ISO-8601 timestamp
    #[serde(rename = "shipDate", default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub complete: bool,
}

impl Fixture for Order {
    const KIND: &'static str = "order";

    fn validate(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err(format!("id must be positive, got {}", self.id));
        }
        if self.pet_id <= 0 {
            return Err(format!("petId must be positive, got {}", self.pet_id));
        }
        if self.quantity <= 0 {
            return Err(format!("quantity must be positive, got {}", self.quantity));
        }
        Ok(())
    }
}
