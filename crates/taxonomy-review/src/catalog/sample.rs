use super::domain::{
    Activity, ActivityId, ContributionType, CriteriaRecord, Region, Taxonomy, TaxonomyId,
};
use super::repository::InMemoryCatalog;

/// Small built-in catalog covering both SC styles, used by the demo command and tests.
///
/// * EU Taxonomy / Climate mitigation / Energy / 4.1 Solar photovoltaic: threshold test with
///   water and biodiversity DNSH criteria.
/// * ASEAN Taxonomy / Climate mitigation / Transport / T1 Electric buses: traffic-light test
///   without DNSH criteria.
pub fn sample_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::default();

    let eu = catalog.upsert_taxonomy(Taxonomy {
        id: TaxonomyId(0),
        name: "EU Taxonomy".to_string(),
        description: "Regulation (EU) 2020/852 technical screening criteria".to_string(),
        region: Region::Europe,
        country_code: None,
    });
    let eu_mitigation = catalog.objective_for(eu, "Climate mitigation");
    catalog.objective_for(eu, "Water");
    let energy = catalog.sector_for(eu, eu_mitigation, "Energy");
    catalog.upsert_activity(Activity {
        id: ActivityId(0),
        taxonomy_id: eu,
        objective_id: eu_mitigation,
        sector_id: energy,
        taxonomy_code: "4.1".to_string(),
        economic_code: "D35.11".to_string(),
        name: "Electricity generation using solar photovoltaic technology".to_string(),
        description: "Construction or operation of electricity generation facilities that produce electricity using solar photovoltaic technology.".to_string(),
        contribution_type: ContributionType::None,
        criteria: CriteriaRecord {
            sc_criteria_type: "threshold".to_string(),
            substantial_contribution_criteria: "The activity generates electricity using solar PV technology.".to_string(),
            dnsh_water: "Environmental degradation risks related to water quality are identified and addressed.".to_string(),
            dnsh_biodiversity: "An environmental impact assessment has been completed where required.".to_string(),
            ..CriteriaRecord::default()
        },
    });

    let asean = catalog.upsert_taxonomy(Taxonomy {
        id: TaxonomyId(0),
        name: "ASEAN Taxonomy".to_string(),
        description: "ASEAN Taxonomy for Sustainable Finance, Plus Standard".to_string(),
        region: Region::Asia,
        country_code: None,
    });
    let asean_mitigation = catalog.objective_for(asean, "Climate mitigation");
    let transport = catalog.sector_for(asean, asean_mitigation, "Transport");
    catalog.upsert_activity(Activity {
        id: ActivityId(0),
        taxonomy_id: asean,
        objective_id: asean_mitigation,
        sector_id: transport,
        taxonomy_code: "T1".to_string(),
        economic_code: "H49.31".to_string(),
        name: "Urban and suburban transport by electric buses".to_string(),
        description: String::new(),
        contribution_type: ContributionType::Transitional,
        criteria: CriteriaRecord {
            sc_criteria_type: "traffic_light".to_string(),
            sc_criteria_green: "Zero direct tailpipe emissions.".to_string(),
            sc_criteria_amber: "Direct emissions below 50 gCO2e/pkm until 2030.".to_string(),
            sc_criteria_red: "Fleet dedicated to fossil fuel transport.".to_string(),
            ..CriteriaRecord::default()
        },
    });

    catalog
}
