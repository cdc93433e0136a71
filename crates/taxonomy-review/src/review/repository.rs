use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Answers, Criteria, Selection};
use super::wizard::{ReviewStep, ReviewSummary, ReviewWizard};

/// Identifier wrapper for review sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub String);

/// Repository record holding one user's review in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
    pub id: ReviewId,
    pub wizard: ReviewWizard,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewSession {
    pub fn view(&self) -> ReviewSessionView {
        let step = self.wizard.step();
        ReviewSessionView {
            review_id: self.id.clone(),
            step,
            step_label: step.label(),
            can_advance: self.wizard.can_advance(),
            selection: self.wizard.selection().clone(),
            criteria: self.wizard.criteria().cloned(),
            answers: self.wizard.answers().clone(),
            summary: self.wizard.summary(),
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: ReviewSession) -> Result<ReviewSession, SessionRepositoryError>;
    fn update(&self, session: ReviewSession) -> Result<(), SessionRepositoryError>;
    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewSession>, SessionRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionRepositoryError {
    #[error("review session already exists")]
    Conflict,
    #[error("review session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Client-facing representation of a session.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSessionView {
    pub review_id: ReviewId,
    pub step: ReviewStep,
    pub step_label: &'static str,
    pub can_advance: bool,
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    pub answers: Answers,
    pub summary: ReviewSummary,
    pub updated_at: DateTime<Utc>,
}
