//! Reference data: taxonomies, their environmental objectives, sectors and activities.

mod domain;
mod import;
mod matrix;
mod repository;
mod sample;
pub mod validation;

pub use domain::{
    Activity, ActivityId, CatalogEntry, ContributionType, CriteriaRecord, EnvironmentalObjective,
    ObjectiveId, Region, Sector, SectorId, Taxonomy, TaxonomyId,
};
pub use import::{CatalogImportError, CatalogImporter, ImportMode, ImportSummary};
pub use matrix::{ObjectivesMatrix, ObjectivesMatrixRow};
pub use repository::{CatalogError, CatalogRepository, InMemoryCatalog};
pub use sample::sample_catalog;
pub use validation::{decide_layout, CriteriaLayout};
