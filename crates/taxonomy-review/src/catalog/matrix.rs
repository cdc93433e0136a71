use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Taxonomy, TaxonomyId};
use super::repository::{CatalogError, CatalogRepository};

/// Taxonomy × objective coverage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectivesMatrix {
    pub objectives: Vec<String>,
    pub rows: Vec<ObjectivesMatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectivesMatrixRow {
    pub taxonomy_id: TaxonomyId,
    pub taxonomy: String,
    pub covered: Vec<bool>,
}

impl ObjectivesMatrix {
    pub fn build<C: CatalogRepository + ?Sized>(catalog: &C) -> Result<Self, CatalogError> {
        let mut per_taxonomy: Vec<(Taxonomy, BTreeSet<String>)> = Vec::new();
        for taxonomy in catalog.taxonomies()? {
            let names = catalog
                .objectives(taxonomy.id)?
                .into_iter()
                .map(|objective| objective.name)
                .collect();
            per_taxonomy.push((taxonomy, names));
        }

        let objectives: Vec<String> = per_taxonomy
            .iter()
            .flat_map(|(_, names)| names.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = per_taxonomy
            .into_iter()
            .map(|(taxonomy, names)| ObjectivesMatrixRow {
                taxonomy_id: taxonomy.id,
                covered: objectives.iter().map(|name| names.contains(name)).collect(),
                taxonomy: taxonomy.name,
            })
            .collect();

        Ok(Self { objectives, rows })
    }

    pub fn has_objective(&self, taxonomy: TaxonomyId, objective: &str) -> bool {
        let Some(column) = self.objectives.iter().position(|name| name == objective) else {
            return false;
        };
        self.rows
            .iter()
            .find(|row| row.taxonomy_id == taxonomy)
            .is_some_and(|row| row.covered[column])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::Region;
    use crate::catalog::InMemoryCatalog;

    fn taxonomy(name: &str) -> Taxonomy {
        Taxonomy {
            id: TaxonomyId(0),
            name: name.to_string(),
            description: String::new(),
            region: Region::Other,
            country_code: None,
        }
    }

    #[test]
    fn matrix_unions_objective_names_in_sorted_order() {
        let mut catalog = InMemoryCatalog::default();
        let eu = catalog.upsert_taxonomy(taxonomy("EU Taxonomy"));
        let rwanda = catalog.upsert_taxonomy(taxonomy("Rwanda Green Taxonomy"));
        catalog.objective_for(eu, "Water");
        catalog.objective_for(eu, "Climate mitigation");
        catalog.objective_for(rwanda, "Climate adaptation");

        let matrix = ObjectivesMatrix::build(&catalog).expect("matrix builds");

        assert_eq!(
            matrix.objectives,
            vec!["Climate adaptation", "Climate mitigation", "Water"]
        );
        assert_eq!(matrix.rows[0].covered, vec![false, true, true]);
        assert!(matrix.has_objective(rwanda, "Climate adaptation"));
        assert!(!matrix.has_objective(rwanda, "Water"));
        assert!(!matrix.has_objective(eu, "Biodiversity"));
    }
}
