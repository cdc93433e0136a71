use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStep {
    ProjectInfo,
    Taxonomy,
    Objective,
    Sector,
    Activity,
    Assessment,
    Results,
}

impl ReviewStep {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::ProjectInfo,
            Self::Taxonomy,
            Self::Objective,
            Self::Sector,
            Self::Activity,
            Self::Assessment,
            Self::Results,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectInfo => "Project Info",
            Self::Taxonomy => "Taxonomy",
            Self::Objective => "Objective",
            Self::Sector => "Sector",
            Self::Activity => "Activity",
            Self::Assessment => "Assessment",
            Self::Results => "Results",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::ProjectInfo => Some(Self::Taxonomy),
            Self::Taxonomy => Some(Self::Objective),
            Self::Objective => Some(Self::Sector),
            Self::Sector => Some(Self::Activity),
            Self::Activity => Some(Self::Assessment),
            Self::Assessment => Some(Self::Results),
            Self::Results => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::ProjectInfo => None,
            Self::Taxonomy => Some(Self::ProjectInfo),
            Self::Objective => Some(Self::Taxonomy),
            Self::Sector => Some(Self::Objective),
            Self::Activity => Some(Self::Sector),
            Self::Assessment => Some(Self::Activity),
            Self::Results => Some(Self::Assessment),
        }
    }
}
