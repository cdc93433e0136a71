use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use taxonomy_review::catalog::{sample_catalog, CatalogImporter, ImportMode, InMemoryCatalog};
use taxonomy_review::error::AppError;
use taxonomy_review::review::{ReviewId, ReviewSession, SessionRepository, SessionRepositoryError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<ReviewId, ReviewSession>>>,
}

impl SessionRepository for InMemorySessionRepository {
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
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(SessionRepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewSession>, SessionRepositoryError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Load the catalog from `path`, or fall back to the built-in sample.
pub(crate) fn load_catalog(
    path: Option<&Path>,
    mode: ImportMode,
) -> Result<InMemoryCatalog, AppError> {
    let Some(path) = path else {
        info!("no catalog path configured, serving the built-in sample catalog");
        return Ok(sample_catalog());
    };

    let (catalog, summary) = CatalogImporter::from_path(path, mode)?;
    info!(
        path = %path.display(),
        created = summary.activities_created,
        updated = summary.activities_updated,
        warnings = summary.warnings,
        "catalog imported"
    );
    Ok(catalog)
}
