use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogEntry, CatalogError, CatalogRepository};

use super::domain::{Answers, Criteria, ProjectInfo, Selection};
use super::evaluation::{assess, ReviewOutcome};
use super::repository::{ReviewId, ReviewSession, SessionRepository, SessionRepositoryError};
use super::wizard::{
    Delivery, FetchRequest, FetchResponse, ReviewEvent, ReviewStep, ReviewWizard, WizardError,
};

/// Service pairing review sessions with the reference catalog they browse.
pub struct ReviewService<C, S> {
    catalog: Arc<C>,
    sessions: Arc<S>,
}

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("review-{id:06}"))
}

/// One-shot self-assessment; criteria are looked up from the catalog when omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluateRequest {
    pub selection: Selection,
    pub criteria: Option<Criteria>,
    pub answers: Answers,
}

impl<C, S> ReviewService<C, S>
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    pub fn new(catalog: Arc<C>, sessions: Arc<S>) -> Self {
        Self { catalog, sessions }
    }

    /// Open a new session with the taxonomy list already loaded.
    pub fn start(&self, project: ProjectInfo) -> Result<ReviewSession, ReviewServiceError> {
        let (mut wizard, initial) = ReviewWizard::start();
        self.deliver(&mut wizard, vec![initial])?;
        wizard.apply(ReviewEvent::UpdateProject { project })?;

        let now = Utc::now();
        let session = ReviewSession {
            id: next_review_id(),
            wizard,
            created_at: now,
            updated_at: now,
        };

        let stored = self.sessions.insert(session)?;
        info!(review_id = %stored.id.0, "review session started");
        Ok(stored)
    }

    /// Apply one user input and load whatever reference data it calls for.
    pub fn apply(
        &self,
        review_id: &ReviewId,
        event: ReviewEvent,
    ) -> Result<ReviewSession, ReviewServiceError> {
        let mut session = self.get(review_id)?;
        let requests = session.wizard.apply(event)?;
        self.deliver(&mut session.wizard, requests)?;
        debug!(review_id = %review_id.0, step = session.wizard.step().label(), "review event applied");
        self.persist(session)
    }

    /// Move to the next step, computing the verdict when results are reached.
    pub fn advance(&self, review_id: &ReviewId) -> Result<ReviewSession, ReviewServiceError> {
        let mut session = self.get(review_id)?;
        let step = session.wizard.advance()?;
        if step == ReviewStep::Results {
            if let Some(outcome) = session.wizard.outcome() {
                info!(
                    review_id = %review_id.0,
                    eligibility = outcome.eligibility.label(),
                    "review result computed"
                );
            }
        }
        self.persist(session)
    }

    pub fn back(&self, review_id: &ReviewId) -> Result<ReviewSession, ReviewServiceError> {
        let mut session = self.get(review_id)?;
        session.wizard.back();
        self.persist(session)
    }

    pub fn get(&self, review_id: &ReviewId) -> Result<ReviewSession, ReviewServiceError> {
        let session = self
            .sessions
            .fetch(review_id)?
            .ok_or(SessionRepositoryError::NotFound)?;
        Ok(session)
    }

    /// Evaluate a self-assessment without keeping a session.
    pub fn evaluate(&self, request: EvaluateRequest) -> Result<ReviewOutcome, ReviewServiceError> {
        let EvaluateRequest {
            selection,
            criteria,
            answers,
        } = request;

        let criteria = match criteria {
            Some(criteria) => Some(criteria),
            None if selection.is_unmatched() => None,
            None => {
                let activity = selection
                    .activity
                    .selected()
                    .copied()
                    .ok_or(ReviewServiceError::CriteriaUnavailable)?;
                Some(self.catalog.criteria(activity)?.to_criteria())
            }
        };

        let outcome = assess(&selection, criteria.as_ref(), &answers)
            .ok_or(ReviewServiceError::CriteriaUnavailable)?;
        info!(
            eligibility = outcome.eligibility.label(),
            "self-assessment evaluated"
        );
        Ok(outcome)
    }

    /// Answer a wizard fetch from the catalog.
    pub fn resolve(&self, request: &FetchRequest) -> Result<FetchResponse, CatalogError> {
        let response = match *request {
            FetchRequest::Taxonomies => FetchResponse::Taxonomies(
                self.catalog
                    .taxonomies()?
                    .iter()
                    .map(CatalogEntry::from)
                    .collect(),
            ),
            FetchRequest::Objectives { taxonomy } => FetchResponse::Objectives(
                self.catalog
                    .objectives(taxonomy)?
                    .iter()
                    .map(CatalogEntry::from)
                    .collect(),
            ),
            FetchRequest::Sectors {
                taxonomy,
                objective,
            } => FetchResponse::Sectors(
                self.catalog
                    .sectors(taxonomy, objective)?
                    .iter()
                    .map(CatalogEntry::from)
                    .collect(),
            ),
            FetchRequest::Activities {
                taxonomy,
                objective,
                sector,
            } => FetchResponse::Activities(
                self.catalog
                    .activities(taxonomy, objective, sector)?
                    .iter()
                    .map(CatalogEntry::from)
                    .collect(),
            ),
            FetchRequest::Criteria { activity } => {
                FetchResponse::Criteria(self.catalog.criteria(activity)?.to_criteria())
            }
        };
        Ok(response)
    }

    fn deliver(
        &self,
        wizard: &mut ReviewWizard,
        requests: Vec<FetchRequest>,
    ) -> Result<(), ReviewServiceError> {
        for request in requests {
            let response = self.resolve(&request)?;
            if wizard.receive(&request, response)? == Delivery::Discarded {
                debug!(?request, "stale catalog response discarded");
            }
        }
        Ok(())
    }

    fn persist(&self, mut session: ReviewSession) -> Result<ReviewSession, ReviewServiceError> {
        session.updated_at = Utc::now();
        self.sessions.update(session.clone())?;
        Ok(session)
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] SessionRepositoryError),
    #[error("criteria are required for a matched activity")]
    CriteriaUnavailable,
}

impl ReviewServiceError {
    /// Whether the caller can fix the request, as opposed to an infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Wizard(_)
                | Self::CriteriaUnavailable
                | Self::Catalog(CatalogError::NotFound { .. })
                | Self::Repository(SessionRepositoryError::NotFound)
        )
    }
}
