use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityId, CatalogEntry, ObjectiveId, SectorId, TaxonomyId};
use crate::review::domain::Criteria;

/// Reference data the wizard needs after a selection changed.
///
/// A request carries the selection it was issued for; its response is only applied while
/// that selection is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FetchRequest {
    Taxonomies,
    Objectives {
        taxonomy: TaxonomyId,
    },
    Sectors {
        taxonomy: TaxonomyId,
        objective: ObjectiveId,
    },
    Activities {
        taxonomy: TaxonomyId,
        objective: ObjectiveId,
        sector: SectorId,
    },
    Criteria {
        activity: ActivityId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "data")]
pub enum FetchResponse {
    Taxonomies(Vec<CatalogEntry<TaxonomyId>>),
    Objectives(Vec<CatalogEntry<ObjectiveId>>),
    Sectors(Vec<CatalogEntry<SectorId>>),
    Activities(Vec<CatalogEntry<ActivityId>>),
    Criteria(Criteria),
}

/// What happened to a delivered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// The selection moved on (or the data already arrived); the response was dropped.
    Discarded,
}

/// Load state of one piece of reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "data")]
pub enum Loadable<T> {
    Idle,
    Loading,
    Ready(T),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Idle
    }
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}
