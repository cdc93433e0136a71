use serde::{Deserialize, Serialize};

use super::domain::{
    Activity, ActivityId, CriteriaRecord, EnvironmentalObjective, ObjectiveId, Region, Sector,
    SectorId, Taxonomy, TaxonomyId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upserted<Id> {
    Created(Id),
    Updated(Id),
}

impl<Id: Copy> Upserted<Id> {
    pub(crate) fn id(self) -> Id {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Read access to the taxonomy hierarchy, mirroring the lookups a review performs.
pub trait CatalogRepository: Send + Sync {
    fn taxonomies(&self) -> Result<Vec<Taxonomy>, CatalogError>;
    fn objectives(&self, taxonomy: TaxonomyId) -> Result<Vec<EnvironmentalObjective>, CatalogError>;
    fn sectors(
        &self,
        taxonomy: TaxonomyId,
        objective: ObjectiveId,
    ) -> Result<Vec<Sector>, CatalogError>;
    fn activities(
        &self,
        taxonomy: TaxonomyId,
        objective: ObjectiveId,
        sector: SectorId,
    ) -> Result<Vec<Activity>, CatalogError>;
    fn criteria(&self, activity: ActivityId) -> Result<CriteriaRecord, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Whole catalog held in memory; also the JSON snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryCatalog {
    pub(crate) taxonomies: Vec<Taxonomy>,
    pub(crate) objectives: Vec<EnvironmentalObjective>,
    pub(crate) sectors: Vec<Sector>,
    pub(crate) activities: Vec<Activity>,
}

impl InMemoryCatalog {
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    pub fn taxonomy(&self, id: TaxonomyId) -> Option<&Taxonomy> {
        self.taxonomies.iter().find(|taxonomy| taxonomy.id == id)
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    /// Insert the taxonomy, or merge it into the one with the same name and return that id.
    ///
    /// A blank description, a missing country code and the `Other` region are what a
    /// spreadsheet row without those cells produces, so they leave stored values alone.
    pub(crate) fn upsert_taxonomy(&mut self, mut taxonomy: Taxonomy) -> TaxonomyId {
        if let Some(existing) = self
            .taxonomies
            .iter_mut()
            .find(|existing| existing.name == taxonomy.name)
        {
            if !taxonomy.description.trim().is_empty() {
                existing.description = taxonomy.description;
            }
            if taxonomy.region != Region::Other {
                existing.region = taxonomy.region;
            }
            if taxonomy.country_code.is_some() {
                existing.country_code = taxonomy.country_code;
            }
            return existing.id;
        }

        taxonomy.id = TaxonomyId(next_id(self.taxonomies.iter().map(|t| t.id.0)));
        let id = taxonomy.id;
        self.taxonomies.push(taxonomy);
        id
    }

    pub(crate) fn objective_for(&mut self, taxonomy_id: TaxonomyId, name: &str) -> ObjectiveId {
        if let Some(existing) = self
            .objectives
            .iter()
            .find(|objective| objective.taxonomy_id == taxonomy_id && objective.name == name)
        {
            return existing.id;
        }

        let id = ObjectiveId(next_id(self.objectives.iter().map(|o| o.id.0)));
        self.objectives.push(EnvironmentalObjective {
            id,
            taxonomy_id,
            name: name.to_string(),
        });
        id
    }

    pub(crate) fn sector_for(
        &mut self,
        taxonomy_id: TaxonomyId,
        objective_id: ObjectiveId,
        name: &str,
    ) -> SectorId {
        if let Some(existing) = self.sectors.iter().find(|sector| {
            sector.taxonomy_id == taxonomy_id
                && sector.objective_id == objective_id
                && sector.name == name
        }) {
            return existing.id;
        }

        let id = SectorId(next_id(self.sectors.iter().map(|s| s.id.0)));
        self.sectors.push(Sector {
            id,
            taxonomy_id,
            objective_id,
            name: name.to_string(),
        });
        id
    }

    /// Activities are keyed by taxonomy, objective, sector and taxonomy code.
    pub(crate) fn upsert_activity(&mut self, mut activity: Activity) -> Upserted<ActivityId> {
        if let Some(existing) = self.activities.iter_mut().find(|existing| {
            existing.taxonomy_id == activity.taxonomy_id
                && existing.objective_id == activity.objective_id
                && existing.sector_id == activity.sector_id
                && existing.taxonomy_code == activity.taxonomy_code
        }) {
            activity.id = existing.id;
            *existing = activity;
            return Upserted::Updated(existing.id);
        }

        activity.id = ActivityId(next_id(self.activities.iter().map(|a| a.id.0)));
        let id = activity.id;
        self.activities.push(activity);
        Upserted::Created(id)
    }
}

fn next_id(existing: impl Iterator<Item = u64>) -> u64 {
    existing.max().unwrap_or(0) + 1
}

impl CatalogRepository for InMemoryCatalog {
    fn taxonomies(&self) -> Result<Vec<Taxonomy>, CatalogError> {
        Ok(self.taxonomies.clone())
    }

    fn objectives(&self, taxonomy: TaxonomyId) -> Result<Vec<EnvironmentalObjective>, CatalogError> {
        Ok(self
            .objectives
            .iter()
            .filter(|objective| objective.taxonomy_id == taxonomy)
            .cloned()
            .collect())
    }

    fn sectors(
        &self,
        taxonomy: TaxonomyId,
        objective: ObjectiveId,
    ) -> Result<Vec<Sector>, CatalogError> {
        Ok(self
            .sectors
            .iter()
            .filter(|sector| sector.taxonomy_id == taxonomy && sector.objective_id == objective)
            .cloned()
            .collect())
    }

    fn activities(
        &self,
        taxonomy: TaxonomyId,
        objective: ObjectiveId,
        sector: SectorId,
    ) -> Result<Vec<Activity>, CatalogError> {
        Ok(self
            .activities
            .iter()
            .filter(|activity| {
                activity.taxonomy_id == taxonomy
                    && activity.objective_id == objective
                    && activity.sector_id == sector
            })
            .cloned()
            .collect())
    }

    fn criteria(&self, activity: ActivityId) -> Result<CriteriaRecord, CatalogError> {
        self.activity(activity)
            .map(|found| found.criteria.clone())
            .ok_or(CatalogError::NotFound {
                kind: "activity",
                id: activity.0,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{ContributionType, Region};

    fn taxonomy(name: &str) -> Taxonomy {
        Taxonomy {
            id: TaxonomyId(0),
            name: name.to_string(),
            description: String::new(),
            region: Region::Other,
            country_code: None,
        }
    }

    fn activity(
        taxonomy_id: TaxonomyId,
        objective_id: ObjectiveId,
        sector_id: SectorId,
        code: &str,
        name: &str,
    ) -> Activity {
        Activity {
            id: ActivityId(0),
            taxonomy_id,
            objective_id,
            sector_id,
            taxonomy_code: code.to_string(),
            economic_code: String::new(),
            name: name.to_string(),
            description: String::new(),
            contribution_type: ContributionType::None,
            criteria: CriteriaRecord::default(),
        }
    }

    #[test]
    fn upserts_hierarchy_by_natural_keys() {
        let mut catalog = InMemoryCatalog::default();
        let eu = catalog.upsert_taxonomy(taxonomy("EU Taxonomy"));
        let again = catalog.upsert_taxonomy(taxonomy("EU Taxonomy"));
        assert_eq!(eu, again);

        let mitigation = catalog.objective_for(eu, "Climate mitigation");
        assert_eq!(catalog.objective_for(eu, "Climate mitigation"), mitigation);

        let energy = catalog.sector_for(eu, mitigation, "Energy");
        let first = catalog.upsert_activity(activity(eu, mitigation, energy, "4.1", "Solar PV"));
        let second =
            catalog.upsert_activity(activity(eu, mitigation, energy, "4.1", "Solar photovoltaic"));

        assert!(matches!(first, Upserted::Created(_)));
        assert_eq!(second, Upserted::Updated(first.id()));
        let first = first.id();
        assert_eq!(catalog.activity_count(), 1);
        assert_eq!(
            catalog.activity(first).map(|a| a.name.as_str()),
            Some("Solar photovoltaic")
        );
    }

    #[test]
    fn taxonomy_upsert_keeps_fields_the_row_leaves_blank() {
        let mut catalog = InMemoryCatalog::default();
        let eu = catalog.upsert_taxonomy(Taxonomy {
            description: "EU Taxonomy Regulation (EU) 2020/852".to_string(),
            region: Region::Europe,
            country_code: Some("EU".to_string()),
            ..taxonomy("EU Taxonomy")
        });

        assert_eq!(catalog.upsert_taxonomy(taxonomy("EU Taxonomy")), eu);

        let stored = catalog.taxonomy(eu).expect("taxonomy stored");
        assert_eq!(stored.description, "EU Taxonomy Regulation (EU) 2020/852");
        assert_eq!(stored.region, Region::Europe);
        assert_eq!(stored.country_code.as_deref(), Some("EU"));

        catalog.upsert_taxonomy(Taxonomy {
            description: "Delegated acts as amended".to_string(),
            ..taxonomy("EU Taxonomy")
        });
        let stored = catalog.taxonomy(eu).expect("taxonomy stored");
        assert_eq!(stored.description, "Delegated acts as amended");
        assert_eq!(stored.region, Region::Europe);
    }

    #[test]
    fn lookups_filter_by_parent_path() {
        let mut catalog = InMemoryCatalog::default();
        let eu = catalog.upsert_taxonomy(taxonomy("EU Taxonomy"));
        let asean = catalog.upsert_taxonomy(taxonomy("ASEAN Taxonomy"));
        let eu_water = catalog.objective_for(eu, "Water");
        catalog.objective_for(asean, "Water");
        let utilities = catalog.sector_for(eu, eu_water, "Utilities");
        catalog.upsert_activity(activity(eu, eu_water, utilities, "5.1", "Water supply"));

        assert_eq!(catalog.objectives(eu).expect("objectives").len(), 1);
        assert_eq!(
            catalog
                .activities(eu, eu_water, utilities)
                .expect("activities")
                .len(),
            1
        );
        assert!(catalog
            .activities(asean, eu_water, utilities)
            .expect("activities")
            .is_empty());
    }

    #[test]
    fn criteria_for_unknown_activity_is_not_found() {
        let catalog = InMemoryCatalog::default();
        match catalog.criteria(ActivityId(9)) {
            Err(CatalogError::NotFound { kind, id }) => {
                assert_eq!(kind, "activity");
                assert_eq!(id, 9);
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
