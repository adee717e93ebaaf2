use serde::{Deserialize, Serialize};

use super::Fixture;

/// Pet availability as published by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub const ALL: [Self; 3] = [Self::Available, Self::Pending, Self::Sold];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Wire shape: `id, category{id,name}, name, photoUrls[], tags[]{id,name}, status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    #[serde(rename = "photoUrls")]
    pub photo_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl Fixture for Pet {
    const KIND: &'static str = "pet";

    fn validate(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err(format!("id must be positive, got {}", self.id));
        }
        if self.name.trim().is_empty() {
            return Err("name is empty".into());
        }
        if self.photo_urls.is_empty() {
            return Err("photoUrls must contain at least one URL".into());
        }
        if self.photo_urls.iter().any(|u| u.trim().is_empty()) {
            return Err("photoUrls contains an empty URL".into());
        }
        if self.tags.iter().any(|t| t.name.trim().is_empty()) {
            return Err("tag name is empty".into());
        }
        Ok(())
    }
}
