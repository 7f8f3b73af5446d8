//! Static artwork catalog for the Haizor gallery.
//!
//! The catalog is an ordered, read-only list of [`Artwork`] records loaded
//! from TOML. The order matters: the watercolor renderer lays artworks out in
//! catalog order, row by row. A copy of the studio's catalog is compiled in so
//! the gallery can start without any configuration on disk.
//!
//! Cart, wishlist and commission requests live here too; they are plain
//! data with validation and no I/O beyond checking a reference file exists.

mod artwork;
mod cart;
mod commission;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use artwork::{Artwork, ArtworkCategory, ArtworkId, CategoryFilter};
pub use cart::{Cart, CartError, CartItem, Wishlist};
pub use commission::{ArtType, CommissionError, CommissionRequest};

const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.toml");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    artworks: Vec<Artwork>,
}

/// Ordered collection of artworks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    artworks: Vec<Artwork>,
}

impl Catalog {
    /// Builds a catalog from already-constructed records, validating them.
    pub fn new(artworks: Vec<Artwork>) -> Result<Self, CatalogError> {
        validate(&artworks)?;
        Ok(Self { artworks })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::new(file.artworks)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// The catalog shipped with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    pub fn get(&self, id: ArtworkId) -> Option<&Artwork> {
        self.artworks.iter().find(|artwork| artwork.id == id)
    }

    /// Returns the artworks matching `filter`, preserving catalog order.
    pub fn filtered(&self, filter: CategoryFilter) -> Vec<Artwork> {
        self.artworks
            .iter()
            .filter(|artwork| filter.matches(artwork))
            .cloned()
            .collect()
    }
}

fn validate(artworks: &[Artwork]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(artworks.len());
    for artwork in artworks {
        if !seen.insert(artwork.id) {
            return Err(CatalogError::Invalid(format!(
                "duplicate artwork id {}",
                artwork.id
            )));
        }
        if artwork.title.trim().is_empty() {
            return Err(CatalogError::Invalid(format!(
                "artwork {} has an empty title",
                artwork.id
            )));
        }
        if artwork.image_url.trim().is_empty() {
            return Err(CatalogError::Invalid(format!(
                "artwork {} ('{}') has no image_url",
                artwork.id, artwork.title
            )));
        }
    }
    Ok(())
}
