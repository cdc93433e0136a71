use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityId, ObjectiveId, SectorId, TaxonomyId};
use crate::review::domain::{Choice, DnshCategory, ProjectInfo, ScCriteriaType, TrafficLight};

use super::step::ReviewStep;

/// Input the wizard reduces into its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ReviewEvent {
    UpdateProject { project: ProjectInfo },
    SelectTaxonomy { choice: Choice<TaxonomyId> },
    SelectObjective { choice: Choice<ObjectiveId> },
    SelectSector { choice: Choice<SectorId> },
    SelectActivity { choice: Choice<ActivityId> },
    AnswerThreshold { met: bool },
    ChooseTrafficLight { light: TrafficLight },
    AnswerTrafficChoice { met: bool },
    AnswerDnsh { category: DnshCategory, met: bool },
    AnswerMinimumSafeguards { met: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{field} does not offer a none-found option")]
    NoneFoundNotOffered { field: &'static str },
    #[error("{field} {id} is not among the loaded options")]
    UnknownOption { field: &'static str, id: u64 },
    #[error("{field} options are not loaded yet")]
    OptionsNotLoaded { field: &'static str },
    #[error("select a {parent} before choosing a {field}")]
    ParentNotSelected {
        field: &'static str,
        parent: &'static str,
    },
    #[error("activity criteria are not loaded")]
    CriteriaNotLoaded,
    #[error("answer only applies to {expected} criteria")]
    WrongScType { expected: ScCriteriaType },
    #[error("choose green or amber before confirming traffic-light criteria")]
    TrafficChoiceRequired,
    #[error("activity has no {} DNSH criteria", .0.label())]
    DnshCategoryNotPresent(DnshCategory),
    #[error("cannot leave the {} step yet", .0.label())]
    CannotAdvance(ReviewStep),
    #[error("review already finished")]
    AlreadyComplete,
    #[error("go back from the results step before changing answers")]
    ResultsLocked,
    #[error("response does not match the {0} request")]
    MismatchedResponse(&'static str),
}
