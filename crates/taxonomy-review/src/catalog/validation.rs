use crate::review::ScCriteriaType;

/// Objective shared by AFOLU and tourism style taxonomies that list practices instead of activities.
pub const OBJECTIVE_MEO: &str = "Multiple environmental objectives";

pub const ENV_OBJECTIVES: [&str; 7] = [
    "Climate mitigation",
    "Climate adaptation",
    "Water",
    "Biodiversity",
    "Circular economy",
    "Pollution prevention",
    OBJECTIVE_MEO,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid environmental objective '{value}', expected one of {allowed:?}")]
    EnvironmentalObjective {
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("invalid sc_criteria_type '{value}', expected threshold or traffic_light")]
    ScCriteriaType { value: String },
}

pub fn is_meo(objective: &str) -> bool {
    objective.trim() == OBJECTIVE_MEO
}

pub fn validate_env_objective(objective: &str) -> Result<&str, ValidationError> {
    let trimmed = objective.trim();
    if ENV_OBJECTIVES.contains(&trimmed) {
        Ok(trimmed)
    } else {
        Err(ValidationError::EnvironmentalObjective {
            value: objective.to_string(),
            allowed: &ENV_OBJECTIVES,
        })
    }
}

pub fn validate_sc_type(sc_type: &str) -> Result<ScCriteriaType, ValidationError> {
    sc_type
        .parse::<ScCriteriaType>()
        .map_err(|_| ValidationError::ScCriteriaType {
            value: sc_type.to_string(),
        })
}

/// Which criteria columns apply to an objective/SC-type combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaLayout {
    /// Green/amber/red columns; practice columns when the objective is MEO.
    Traffic { use_meo: bool },
    /// Threshold text plus non-eligibility; eligible/non-eligible practices when MEO.
    Threshold { use_meo: bool },
    Unknown { use_meo: bool },
}

impl CriteriaLayout {
    pub const fn columns(self) -> &'static str {
        match self {
            Self::Traffic { use_meo: true } => "green/amber/red_practices",
            Self::Traffic { use_meo: false } => "sc_criteria_*",
            Self::Threshold { use_meo: true } => "practice + eligible/non_eligible",
            Self::Threshold { use_meo: false } => "substantial/non_eligibility",
            Self::Unknown { .. } => "",
        }
    }
}

pub fn decide_layout(objective: &str, sc_type: &str) -> CriteriaLayout {
    let use_meo = is_meo(objective);
    match sc_type.trim().parse::<ScCriteriaType>() {
        Ok(ScCriteriaType::TrafficLight) => CriteriaLayout::Traffic { use_meo },
        Ok(ScCriteriaType::Threshold) => CriteriaLayout::Threshold { use_meo },
        Err(_) => CriteriaLayout::Unknown { use_meo },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objectives_are_trimmed_before_matching() {
        assert_eq!(validate_env_objective("  Water "), Ok("Water"));
        assert!(matches!(
            validate_env_objective("Ocean health"),
            Err(ValidationError::EnvironmentalObjective { .. })
        ));
    }

    #[test]
    fn sc_type_validation_is_strict() {
        assert_eq!(
            validate_sc_type("traffic_light"),
            Ok(ScCriteriaType::TrafficLight)
        );
        assert!(validate_sc_type("Traffic light").is_err());
    }

    #[test]
    fn layout_depends_on_objective_and_type() {
        assert_eq!(
            decide_layout(OBJECTIVE_MEO, "traffic_light").columns(),
            "green/amber/red_practices"
        );
        assert_eq!(
            decide_layout("Water", "threshold"),
            CriteriaLayout::Threshold { use_meo: false }
        );
        assert_eq!(
            decide_layout("Water", "qualitative"),
            CriteriaLayout::Unknown { use_meo: false }
        );
    }
}
