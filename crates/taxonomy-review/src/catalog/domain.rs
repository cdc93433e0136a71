use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::review::{Criteria, DnshCategory, ScCriteriaType, TrafficLight};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                value.trim().parse::<u64>().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a taxonomy (EU, ASEAN, Rwanda, ...).
    TaxonomyId
);
catalog_id!(ObjectiveId);
catalog_id!(SectorId);
catalog_id!(ActivityId);

/// Geographic grouping a taxonomy is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Region {
    Europe,
    Asia,
    Africa,
    #[serde(rename = "Latin America and the Caribbean")]
    LatinAmericaAndCaribbean,
    Oceania,
    #[serde(rename = "Middle East")]
    MiddleEast,
    #[default]
    Other,
}

impl Region {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Europe => "Europe",
            Self::Asia => "Asia",
            Self::Africa => "Africa",
            Self::LatinAmericaAndCaribbean => "Latin America and the Caribbean",
            Self::Oceania => "Oceania",
            Self::MiddleEast => "Middle East",
            Self::Other => "Other",
        }
    }

    /// Unknown or blank labels land in `Other`.
    pub fn from_label(value: &str) -> Self {
        let trimmed = value.trim();
        [
            Self::Europe,
            Self::Asia,
            Self::Africa,
            Self::LatinAmericaAndCaribbean,
            Self::Oceania,
            Self::MiddleEast,
        ]
        .into_iter()
        .find(|region| region.label().eq_ignore_ascii_case(trimmed))
        .unwrap_or(Self::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub id: TaxonomyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentalObjective {
    pub id: ObjectiveId,
    pub taxonomy_id: TaxonomyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub taxonomy_id: TaxonomyId,
    pub objective_id: ObjectiveId,
    pub name: String,
}

/// Whether an activity enables others or is a transitional step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContributionType {
    Enabling,
    Transitional,
    #[default]
    None,
}

impl ContributionType {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "enabling" => Self::Enabling,
            "transitional" => Self::Transitional,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub taxonomy_id: TaxonomyId,
    pub objective_id: ObjectiveId,
    pub sector_id: SectorId,
    pub taxonomy_code: String,
    #[serde(default)]
    pub economic_code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contribution_type: ContributionType,
    #[serde(default)]
    pub criteria: CriteriaRecord,
}

/// Criteria columns exactly as stored in the catalog; `sc_criteria_type` stays raw text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaRecord {
    pub sc_criteria_type: String,
    pub substantial_contribution_criteria: String,
    pub non_eligibility_criteria: String,
    pub sc_criteria_green: String,
    pub sc_criteria_amber: String,
    pub sc_criteria_red: String,
    pub dnsh_climate_adaptation: String,
    pub dnsh_water: String,
    pub dnsh_circular_economy: String,
    pub dnsh_pollution_prevention: String,
    pub dnsh_biodiversity: String,
    pub dnsh_land_management: String,
}

impl CriteriaRecord {
    pub fn dnsh_text(&self, category: DnshCategory) -> &str {
        match category {
            DnshCategory::ClimateAdaptation => &self.dnsh_climate_adaptation,
            DnshCategory::Water => &self.dnsh_water,
            DnshCategory::CircularEconomy => &self.dnsh_circular_economy,
            DnshCategory::PollutionPrevention => &self.dnsh_pollution_prevention,
            DnshCategory::Biodiversity => &self.dnsh_biodiversity,
            DnshCategory::LandManagement => &self.dnsh_land_management,
        }
    }

    pub(crate) fn dnsh_text_mut(&mut self, category: DnshCategory) -> &mut String {
        match category {
            DnshCategory::ClimateAdaptation => &mut self.dnsh_climate_adaptation,
            DnshCategory::Water => &mut self.dnsh_water,
            DnshCategory::CircularEconomy => &mut self.dnsh_circular_economy,
            DnshCategory::PollutionPrevention => &mut self.dnsh_pollution_prevention,
            DnshCategory::Biodiversity => &mut self.dnsh_biodiversity,
            DnshCategory::LandManagement => &mut self.dnsh_land_management,
        }
    }

    /// Project the stored columns onto the review model, normalising the SC type.
    pub fn to_criteria(&self) -> Criteria {
        let traffic_criteria: BTreeMap<TrafficLight, String> = [
            (TrafficLight::Green, &self.sc_criteria_green),
            (TrafficLight::Amber, &self.sc_criteria_amber),
            (TrafficLight::Red, &self.sc_criteria_red),
        ]
        .into_iter()
        .filter_map(|(light, text)| non_blank(text).map(|text| (light, text)))
        .collect();

        let dnsh_criteria = DnshCategory::ordered()
            .into_iter()
            .filter_map(|category| non_blank(self.dnsh_text(category)).map(|text| (category, text)))
            .collect();

        Criteria {
            substantial_contribution_type: ScCriteriaType::normalize(&self.sc_criteria_type),
            threshold_criteria: non_blank(&self.substantial_contribution_criteria),
            traffic_criteria,
            dnsh_criteria,
            non_eligibility_criteria: non_blank(&self.non_eligibility_criteria),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Slim id/name pair offered as an option in the review's selection steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry<I> {
    pub id: I,
    pub name: String,
}

impl From<&Taxonomy> for CatalogEntry<TaxonomyId> {
    fn from(value: &Taxonomy) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl From<&EnvironmentalObjective> for CatalogEntry<ObjectiveId> {
    fn from(value: &EnvironmentalObjective) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl From<&Sector> for CatalogEntry<SectorId> {
    fn from(value: &Sector) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl From<&Activity> for CatalogEntry<ActivityId> {
    fn from(value: &Activity) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}
