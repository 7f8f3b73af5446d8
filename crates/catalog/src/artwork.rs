use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identifier of an artwork inside a catalog.
pub type ArtworkId = u32;

/// Broad production technique used to group the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtworkCategory {
    #[serde(rename = "handmade", alias = "Handmade Paper")]
    Handmade,
    #[serde(rename = "digital", alias = "Digital")]
    Digital,
}

impl ArtworkCategory {
    pub fn label(self) -> &'static str {
        match self {
            ArtworkCategory::Handmade => "Handmade Paper",
            ArtworkCategory::Digital => "Digital",
        }
    }
}

impl fmt::Display for ArtworkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One piece of displayed art.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    pub year: u16,
    pub category: ArtworkCategory,
    pub medium: String,
    pub size: String,
    /// Price in whole currency units; unpriced works are display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl Artwork {
    pub fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }
}

/// Collection filter offered by the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ArtworkCategory),
}

impl CategoryFilter {
    pub fn matches(self, artwork: &Artwork) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => artwork.category == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("filter must not be empty".to_string());
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "all" | "*" => Ok(CategoryFilter::All),
            "handmade" | "handmade paper" | "paper" => {
                Ok(CategoryFilter::Only(ArtworkCategory::Handmade))
            }
            "digital" => Ok(CategoryFilter::Only(ArtworkCategory::Digital)),
            other => Err(format!(
                "unknown filter '{other}'; expected all, handmade, or digital"
            )),
        }
    }
}
