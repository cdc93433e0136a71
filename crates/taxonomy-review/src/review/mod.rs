//! Guided project review against a taxonomy activity.
//!
//! The wizard collects project details, walks the catalog hierarchy and records the
//! self-assessment; the evaluator turns the finished review into an eligibility verdict.
//! [`ReviewService`] keeps sessions in a [`SessionRepository`] and answers the wizard's
//! reference-data fetches from a [`CatalogRepository`](crate::catalog::CatalogRepository).

pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    Answers, Choice, ChoiceParseError, Criteria, DnshCategory, Eligibility, ProjectInfo,
    ScCriteriaType, Selection, TrafficLight, UnrecognisedValue, NONE_FOUND,
};
pub use evaluation::{assess, evaluate, CriterionCheck, CriterionGroup, ReviewOutcome};
pub use repository::{
    ReviewId, ReviewSession, ReviewSessionView, SessionRepository, SessionRepositoryError,
};
pub use router::review_router;
pub use service::{EvaluateRequest, ReviewService, ReviewServiceError};
pub use wizard::{
    Delivery, FetchRequest, FetchResponse, Loadable, ReviewEvent, ReviewStep, ReviewSummary,
    ReviewWizard, WizardError,
};
