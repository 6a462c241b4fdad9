//! Precomputed property listings with viewport filtering.

pub mod domain;
mod parser;
pub mod router;

pub use domain::{BoundingBox, PropertyListing, PropertyQuery};
pub use router::properties_router;

use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub enum CatalogError {
    Missing { path: PathBuf },
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Missing { path } => {
                write!(f, "property data file not found at {}", path.display())
            }
            CatalogError::Io(err) => write!(f, "failed to read property data: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid property CSV data: {}", err),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Missing { .. } => None,
            CatalogError::Io(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Read-only listing set loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct PropertyCatalog {
    listings: Vec<PropertyListing>,
}

impl PropertyCatalog {
    pub fn new(listings: Vec<PropertyListing>) -> Self {
        Self { listings }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::Missing {
                path: path.to_path_buf(),
            });
        }

        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(count = catalog.len(), path = %path.display(), "loaded property listings");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(Self::new(parser::parse_listings(reader)?))
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn listings(&self) -> &[PropertyListing] {
        &self.listings
    }

    /// Listings inside the window, or every listing when no window is given.
    pub fn search(&self, bounds: Option<BoundingBox>) -> Vec<PropertyListing> {
        match bounds {
            Some(bounds) => self
                .listings
                .iter()
                .filter(|listing| bounds.contains(listing.latitude, listing.longitude))
                .cloned()
                .collect(),
            None => self.listings.clone(),
        }
    }

    pub fn get(&self, region_id: i64) -> Option<&PropertyListing> {
        self.listings
            .iter()
            .find(|listing| listing.region_id == region_id)
    }
}
