use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use taxonomy_review::catalog::{
    sample_catalog, ActivityId, InMemoryCatalog, ObjectiveId, SectorId, TaxonomyId,
};
use taxonomy_review::review::{
    review_router, Choice, DnshCategory, Eligibility, ProjectInfo, ReviewEvent, ReviewId,
    ReviewService, ReviewSession, ReviewStep, SessionRepository, SessionRepositoryError,
};
use tower::ServiceExt;

#[derive(Default)]
struct InMemorySessions {
    sessions: Mutex<HashMap<ReviewId, ReviewSession>>,
}

impl SessionRepository for InMemorySessions {
    fn insert(&self, session: ReviewSession) -> Result<ReviewSession, SessionRepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: ReviewSession) -> Result<(), SessionRepositoryError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewSession>, SessionRepositoryError> {
        Ok(self
            .sessions
            .lock()
            .expect("session mutex poisoned")
            .get(id)
            .cloned())
    }
}

type Service = ReviewService<InMemoryCatalog, InMemorySessions>;

fn service() -> Service {
    ReviewService::new(
        Arc::new(sample_catalog()),
        Arc::new(InMemorySessions::default()),
    )
}

fn select_solar_pv(service: &Service, id: &ReviewId) {
    for event in [
        ReviewEvent::SelectTaxonomy {
            choice: Choice::Selected(TaxonomyId(1)),
        },
        ReviewEvent::SelectObjective {
            choice: Choice::Selected(ObjectiveId(1)),
        },
        ReviewEvent::SelectSector {
            choice: Choice::Selected(SectorId(1)),
        },
        ReviewEvent::SelectActivity {
            choice: Choice::Selected(ActivityId(1)),
        },
    ] {
        service.apply(id, event).expect("selection applied");
    }
}

#[test]
fn threshold_review_reaches_aligned_result() {
    let service = service();
    let session = service
        .start(ProjectInfo {
            name: "Rooftop solar".to_string(),
            region: "Europe".to_string(),
            description: "500 kWp on warehouse roofs".to_string(),
        })
        .expect("session starts");
    select_solar_pv(&service, &session.id);

    for event in [
        ReviewEvent::AnswerThreshold { met: true },
        ReviewEvent::AnswerDnsh {
            category: DnshCategory::Water,
            met: true,
        },
        ReviewEvent::AnswerDnsh {
            category: DnshCategory::Biodiversity,
            met: true,
        },
        ReviewEvent::AnswerMinimumSafeguards { met: true },
    ] {
        service.apply(&session.id, event).expect("answer applied");
    }
    for _ in 0..6 {
        service.advance(&session.id).expect("step advanced");
    }

    let finished = service.get(&session.id).expect("session stored");
    let view = finished.view();
    assert_eq!(view.step, ReviewStep::Results);
    assert_eq!(view.summary.project, "Rooftop solar");
    assert_eq!(view.summary.taxonomy, "EU Taxonomy");
    assert_eq!(view.summary.sector, "Energy");
    let outcome = view.summary.outcome.expect("outcome computed");
    assert_eq!(outcome.eligibility, Eligibility::Aligned);
}

#[test]
fn changing_the_taxonomy_late_discards_the_assessment() {
    let service = service();
    let session = service.start(ProjectInfo::default()).expect("session starts");
    select_solar_pv(&service, &session.id);
    service
        .apply(&session.id, ReviewEvent::AnswerThreshold { met: true })
        .expect("answer applied");

    let updated = service
        .apply(
            &session.id,
            ReviewEvent::SelectTaxonomy {
                choice: Choice::Selected(TaxonomyId(2)),
            },
        )
        .expect("taxonomy changed");

    let wizard = &updated.wizard;
    assert_eq!(wizard.selection().objective, Choice::Unset);
    assert_eq!(wizard.selection().activity, Choice::Unset);
    assert!(wizard.criteria().is_none());
    assert!(!wizard.answers().threshold_met);
    let objectives = wizard.objectives().ready().expect("asean objectives loaded");
    assert_eq!(objectives.len(), 1);
}

#[tokio::test]
async fn evaluate_endpoint_reports_not_eligible_for_unmatched_activity() {
    let router = review_router(Arc::new(service()));
    let payload = serde_json::json!({
        "selection": {
            "taxonomy": { "kind": "selected", "id": 1 },
            "objective": { "kind": "selected", "id": 1 },
            "sector": { "kind": "selected", "id": 1 },
            "activity": { "kind": "none_found" }
        }
    });

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility/evaluate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).expect("payload encodes")))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    let outcome: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(outcome["eligibility"], "not_eligible");
    assert_eq!(
        outcome["reason"],
        "No matching sector or activity was selected."
    );
}
