use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityId, ObjectiveId, SectorId, TaxonomyId};

/// Raw value the selection controls use for "I don't see a matching option".
pub const NONE_FOUND: &str = "__none__";

/// One step of the taxonomy → objective → sector → activity path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Choice<T> {
    Unset,
    NoneFound,
    Selected(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::Unset
    }
}

impl<T> Choice<T> {
    /// A choice is answered once the user either picked an option or declared none fits.
    pub fn is_answered(&self) -> bool {
        !matches!(self, Choice::Unset)
    }

    pub fn is_none_found(&self) -> bool {
        matches!(self, Choice::NoneFound)
    }

    pub fn selected(&self) -> Option<&T> {
        match self {
            Choice::Selected(id) => Some(id),
            _ => None,
        }
    }
}

impl<T: FromStr> Choice<T> {
    /// Parse the raw form used by selection controls: empty is unset, `__none__` is the sentinel.
    pub fn parse(raw: &str) -> Result<Self, ChoiceParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Choice::Unset);
        }
        if trimmed == NONE_FOUND {
            return Ok(Choice::NoneFound);
        }
        trimmed
            .parse::<T>()
            .map(Choice::Selected)
            .map_err(|_| ChoiceParseError {
                value: trimmed.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is neither an identifier nor the none-found sentinel")]
pub struct ChoiceParseError {
    pub value: String,
}

/// The user's path through the catalog hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub taxonomy: Choice<TaxonomyId>,
    pub objective: Choice<ObjectiveId>,
    pub sector: Choice<SectorId>,
    pub activity: Choice<ActivityId>,
}

impl Selection {
    /// True when the user declared that no sector or no activity matches the project.
    pub fn is_unmatched(&self) -> bool {
        self.sector.is_none_found() || self.activity.is_none_found()
    }
}

/// Fixed set of "Do No Significant Harm" categories an activity may carry criteria for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnshCategory {
    ClimateAdaptation,
    Water,
    CircularEconomy,
    PollutionPrevention,
    Biodiversity,
    LandManagement,
}

impl DnshCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::ClimateAdaptation,
            Self::Water,
            Self::CircularEconomy,
            Self::PollutionPrevention,
            Self::Biodiversity,
            Self::LandManagement,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ClimateAdaptation => "Climate Adaptation",
            Self::Water => "Water",
            Self::CircularEconomy => "Circular Economy",
            Self::PollutionPrevention => "Pollution Prevention",
            Self::Biodiversity => "Biodiversity",
            Self::LandManagement => "Land Management",
        }
    }

    /// Column name used by catalog spreadsheets and criteria payloads.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::ClimateAdaptation => "dnsh_climate_adaptation",
            Self::Water => "dnsh_water",
            Self::CircularEconomy => "dnsh_circular_economy",
            Self::PollutionPrevention => "dnsh_pollution_prevention",
            Self::Biodiversity => "dnsh_biodiversity",
            Self::LandManagement => "dnsh_land_management",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    Green,
    Amber,
    Red,
}

impl TrafficLight {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Amber => "Amber",
            Self::Red => "Red",
        }
    }
}

impl FromStr for TrafficLight {
    type Err = UnrecognisedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "amber" => Ok(Self::Amber),
            "red" => Ok(Self::Red),
            _ => Err(UnrecognisedValue {
                value: value.to_string(),
            }),
        }
    }
}

/// How an activity expresses its substantial-contribution test.
///
/// Deserialisation goes through [`ScCriteriaType::normalize`], so incoming JSON never
/// rejects an unfamiliar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ScCriteriaType {
    #[default]
    Threshold,
    TrafficLight,
}

impl ScCriteriaType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::TrafficLight => "traffic_light",
        }
    }

    /// Lenient reading of catalog data: `"Traffic light"` becomes `traffic_light` and
    /// anything unrecognised, including an empty value, falls back to a threshold test.
    pub fn normalize(raw: &str) -> Self {
        let normalized = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_ascii_lowercase();

        match normalized.as_str() {
            "traffic_light" => Self::TrafficLight,
            _ => Self::Threshold,
        }
    }
}

impl From<String> for ScCriteriaType {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl FromStr for ScCriteriaType {
    type Err = UnrecognisedValue;

    /// Strict reading used by catalog validation.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "threshold" => Ok(Self::Threshold),
            "traffic_light" => Ok(Self::TrafficLight),
            _ => Err(UnrecognisedValue {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScCriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised value '{value}'")]
pub struct UnrecognisedValue {
    pub value: String,
}

/// Compliance rules of one activity as consumed by the review.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub substantial_contribution_type: ScCriteriaType,
    pub threshold_criteria: Option<String>,
    pub traffic_criteria: BTreeMap<TrafficLight, String>,
    pub dnsh_criteria: BTreeMap<DnshCategory, String>,
    pub non_eligibility_criteria: Option<String>,
}

impl Criteria {
    /// Categories whose criteria text is non-empty, in canonical order.
    pub fn present_dnsh_categories(&self) -> Vec<DnshCategory> {
        DnshCategory::ordered()
            .into_iter()
            .filter(|category| {
                self.dnsh_criteria
                    .get(category)
                    .is_some_and(|text| !text.trim().is_empty())
            })
            .collect()
    }

    pub fn is_dnsh_present(&self, category: DnshCategory) -> bool {
        self.dnsh_criteria
            .get(&category)
            .is_some_and(|text| !text.trim().is_empty())
    }

    pub fn traffic_text(&self, light: TrafficLight) -> Option<&str> {
        self.traffic_criteria
            .get(&light)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Self-reported answers collected during the assessment step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Answers {
    pub threshold_met: bool,
    pub traffic_choice: Option<TrafficLight>,
    pub traffic_choice_met: bool,
    pub dnsh_met: BTreeMap<DnshCategory, bool>,
    pub minimum_safeguards_met: bool,
}

impl Answers {
    /// Fresh answers for freshly loaded criteria: everything unmet, one DNSH entry per present category.
    pub fn for_criteria(criteria: &Criteria) -> Self {
        Self {
            dnsh_met: criteria
                .present_dnsh_categories()
                .into_iter()
                .map(|category| (category, false))
                .collect(),
            ..Self::default()
        }
    }
}

/// Final verdict of a project review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    NotEligible,
    EligibleNotAligned,
    Aligned,
}

impl Eligibility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotEligible => "Not eligible",
            Self::EligibleNotAligned => "Eligible but not aligned",
            Self::Aligned => "Aligned",
        }
    }
}

/// Free-text project description captured before the catalog selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub name: String,
    pub region: String,
    pub description: String,
}

impl ProjectInfo {
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "Untitled"
        } else {
            trimmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parse_understands_sentinel_and_blank() {
        assert_eq!(Choice::<SectorId>::parse("").unwrap(), Choice::Unset);
        assert_eq!(
            Choice::<SectorId>::parse(" __none__ ").unwrap(),
            Choice::NoneFound
        );
        assert_eq!(
            Choice::<SectorId>::parse("42").unwrap(),
            Choice::Selected(SectorId(42))
        );
        assert!(Choice::<SectorId>::parse("energy").is_err());
    }

    #[test]
    fn sc_type_normalization_defaults_to_threshold() {
        assert_eq!(
            ScCriteriaType::normalize("Traffic light"),
            ScCriteriaType::TrafficLight
        );
        assert_eq!(
            ScCriteriaType::normalize("  TRAFFIC_LIGHT "),
            ScCriteriaType::TrafficLight
        );
        assert_eq!(ScCriteriaType::normalize(""), ScCriteriaType::Threshold);
        assert_eq!(
            ScCriteriaType::normalize("qualitative"),
            ScCriteriaType::Threshold
        );
        assert!("Traffic light".parse::<ScCriteriaType>().is_err());
    }

    #[test]
    fn blank_dnsh_text_is_not_present() {
        let mut criteria = Criteria::default();
        criteria
            .dnsh_criteria
            .insert(DnshCategory::Water, "Protect water bodies".to_string());
        criteria
            .dnsh_criteria
            .insert(DnshCategory::Biodiversity, "   ".to_string());

        assert_eq!(criteria.present_dnsh_categories(), vec![DnshCategory::Water]);

        let answers = Answers::for_criteria(&criteria);
        assert_eq!(answers.dnsh_met.len(), 1);
        assert_eq!(answers.dnsh_met.get(&DnshCategory::Water), Some(&false));
    }

    #[test]
    fn selection_serializes_with_tagged_choices() {
        let selection = Selection {
            taxonomy: Choice::Selected(TaxonomyId(1)),
            objective: Choice::Selected(ObjectiveId(2)),
            sector: Choice::NoneFound,
            activity: Choice::Unset,
        };

        let json = serde_json::to_value(&selection).expect("serializes");
        assert_eq!(json["taxonomy"]["kind"], "selected");
        assert_eq!(json["taxonomy"]["id"], 1);
        assert_eq!(json["sector"]["kind"], "none_found");

        let back: Selection = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, selection);
    }
}
