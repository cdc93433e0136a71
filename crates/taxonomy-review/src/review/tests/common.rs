use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::catalog::{
    sample_catalog, ActivityId, CatalogEntry, InMemoryCatalog, ObjectiveId, SectorId, TaxonomyId,
};
use crate::review::domain::{
    Answers, Choice, Criteria, DnshCategory, ScCriteriaType, Selection, TrafficLight,
};
use crate::review::repository::{ReviewId, ReviewSession, SessionRepository, SessionRepositoryError};
use crate::review::wizard::{FetchRequest, FetchResponse, ReviewEvent, ReviewWizard};
use crate::review::{review_router, ReviewService};

pub(super) const EU: TaxonomyId = TaxonomyId(1);
pub(super) const EU_MITIGATION: ObjectiveId = ObjectiveId(1);
pub(super) const EU_WATER: ObjectiveId = ObjectiveId(2);
pub(super) const ENERGY: SectorId = SectorId(1);
pub(super) const SOLAR_PV: ActivityId = ActivityId(1);
pub(super) const ASEAN: TaxonomyId = TaxonomyId(2);
pub(super) const ASEAN_MITIGATION: ObjectiveId = ObjectiveId(3);
pub(super) const TRANSPORT: SectorId = SectorId(2);
pub(super) const E_BUSES: ActivityId = ActivityId(2);

pub(super) fn matched_selection() -> Selection {
    Selection {
        taxonomy: Choice::Selected(EU),
        objective: Choice::Selected(EU_MITIGATION),
        sector: Choice::Selected(ENERGY),
        activity: Choice::Selected(SOLAR_PV),
    }
}

pub(super) fn threshold_criteria() -> Criteria {
    let mut dnsh_criteria = BTreeMap::new();
    dnsh_criteria.insert(
        DnshCategory::Water,
        "Water quality risks addressed.".to_string(),
    );
    dnsh_criteria.insert(
        DnshCategory::Biodiversity,
        "Impact assessment completed.".to_string(),
    );

    Criteria {
        substantial_contribution_type: ScCriteriaType::Threshold,
        threshold_criteria: Some("Life-cycle emissions below 100 gCO2e/kWh.".to_string()),
        dnsh_criteria,
        ..Criteria::default()
    }
}

pub(super) fn traffic_criteria() -> Criteria {
    let mut traffic_criteria = BTreeMap::new();
    traffic_criteria.insert(TrafficLight::Green, "Zero direct emissions.".to_string());
    traffic_criteria.insert(TrafficLight::Amber, "Below 50 gCO2e/pkm.".to_string());
    traffic_criteria.insert(TrafficLight::Red, "Fossil fuel transport.".to_string());

    Criteria {
        substantial_contribution_type: ScCriteriaType::TrafficLight,
        traffic_criteria,
        ..Criteria::default()
    }
}

/// Answers satisfying every criterion of `criteria` on the threshold path.
pub(super) fn compliant_threshold_answers(criteria: &Criteria) -> Answers {
    let mut answers = Answers::for_criteria(criteria);
    answers.threshold_met = true;
    answers.dnsh_met.values_mut().for_each(|met| *met = true);
    answers.minimum_safeguards_met = true;
    answers
}

pub(super) fn entries<I: Copy>(items: &[(I, &str)]) -> Vec<CatalogEntry<I>> {
    items
        .iter()
        .map(|(id, name)| CatalogEntry {
            id: *id,
            name: name.to_string(),
        })
        .collect()
}

/// Drive a wizard through the EU solar path, answering each fetch as it is requested.
pub(super) fn wizard_with_criteria(criteria: Criteria) -> ReviewWizard {
    let (mut wizard, initial) = ReviewWizard::start();
    wizard
        .receive(
            &initial,
            FetchResponse::Taxonomies(entries(&[(EU, "EU Taxonomy"), (ASEAN, "ASEAN Taxonomy")])),
        )
        .expect("taxonomies delivered");

    let requests = wizard
        .apply(ReviewEvent::SelectTaxonomy {
            choice: Choice::Selected(EU),
        })
        .expect("taxonomy selected");
    wizard
        .receive(
            &requests[0],
            FetchResponse::Objectives(entries(&[
                (EU_MITIGATION, "Climate mitigation"),
                (EU_WATER, "Water"),
            ])),
        )
        .expect("objectives delivered");

    let requests = wizard
        .apply(ReviewEvent::SelectObjective {
            choice: Choice::Selected(EU_MITIGATION),
        })
        .expect("objective selected");
    wizard
        .receive(
            &requests[0],
            FetchResponse::Sectors(entries(&[(ENERGY, "Energy")])),
        )
        .expect("sectors delivered");

    let requests = wizard
        .apply(ReviewEvent::SelectSector {
            choice: Choice::Selected(ENERGY),
        })
        .expect("sector selected");
    wizard
        .receive(
            &requests[0],
            FetchResponse::Activities(entries(&[(SOLAR_PV, "Solar photovoltaic")])),
        )
        .expect("activities delivered");

    let requests = wizard
        .apply(ReviewEvent::SelectActivity {
            choice: Choice::Selected(SOLAR_PV),
        })
        .expect("activity selected");
    assert_eq!(
        requests,
        vec![FetchRequest::Criteria { activity: SOLAR_PV }]
    );
    wizard
        .receive(&requests[0], FetchResponse::Criteria(criteria))
        .expect("criteria delivered");

    wizard
}

/// Press Next until the wizard sits on the assessment step.
pub(super) fn advance_to_assessment(wizard: &mut ReviewWizard) {
    for _ in 0..5 {
        wizard.advance().expect("step requirements satisfied");
    }
}

pub(super) fn build_service() -> (
    ReviewService<InMemoryCatalog, MemorySessions>,
    Arc<MemorySessions>,
) {
    let sessions = Arc::new(MemorySessions::default());
    let service = ReviewService::new(Arc::new(sample_catalog()), sessions.clone());
    (service, sessions)
}

pub(super) fn review_router_with_service(
    service: ReviewService<InMemoryCatalog, MemorySessions>,
) -> axum::Router {
    review_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) sessions: Arc<Mutex<HashMap<ReviewId, ReviewSession>>>,
}

impl MemorySessions {
    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("session mutex poisoned").len()
    }
}

impl SessionRepository for MemorySessions {
    fn insert(&self, session: ReviewSession) -> Result<ReviewSession, SessionRepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: ReviewSession) -> Result<(), SessionRepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewSession>, SessionRepositoryError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableSessions;

impl SessionRepository for UnavailableSessions {
    fn insert(&self, _session: ReviewSession) -> Result<ReviewSession, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("maintenance".to_string()))
    }

    fn update(&self, _session: ReviewSession) -> Result<(), SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &ReviewId) -> Result<Option<ReviewSession>, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("maintenance".to_string()))
    }
}
