//! Step-by-step project review: project info, catalog path, self-assessment, verdict.
//!
//! All state changes go through [`ReviewWizard::apply`]. Changing a selection resets every
//! field that depends on it (never the ones before it) and returns the reference-data
//! fetches the new selection needs. Responses come back through [`ReviewWizard::receive`],
//! which drops anything issued for a selection that is no longer current.

mod event;
mod fetch;
mod step;

pub use event::{ReviewEvent, WizardError};
pub use fetch::{Delivery, FetchRequest, FetchResponse, Loadable};
pub use step::ReviewStep;

use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityId, CatalogEntry, ObjectiveId, SectorId, TaxonomyId};

use super::domain::{
    Answers, Choice, Criteria, DnshCategory, ProjectInfo, ScCriteriaType, Selection, TrafficLight,
};
use super::evaluation::{assess, ReviewOutcome};

/// Selection fields in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SelectionField {
    Taxonomy,
    Objective,
    Sector,
    Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewWizard {
    step: ReviewStep,
    project: ProjectInfo,
    selection: Selection,
    taxonomies: Loadable<Vec<CatalogEntry<TaxonomyId>>>,
    objectives: Loadable<Vec<CatalogEntry<ObjectiveId>>>,
    sectors: Loadable<Vec<CatalogEntry<SectorId>>>,
    activities: Loadable<Vec<CatalogEntry<ActivityId>>>,
    criteria: Loadable<Criteria>,
    answers: Answers,
    outcome: Option<ReviewOutcome>,
}

impl ReviewWizard {
    /// New wizard at the project info step, plus the initial taxonomy list fetch.
    pub fn start() -> (Self, FetchRequest) {
        let wizard = Self {
            step: ReviewStep::ProjectInfo,
            project: ProjectInfo::default(),
            selection: Selection::default(),
            taxonomies: Loadable::Loading,
            objectives: Loadable::Idle,
            sectors: Loadable::Idle,
            activities: Loadable::Idle,
            criteria: Loadable::Idle,
            answers: Answers::default(),
            outcome: None,
        };
        (wizard, FetchRequest::Taxonomies)
    }

    pub fn step(&self) -> ReviewStep {
        self.step
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn criteria(&self) -> Option<&Criteria> {
        self.criteria.ready()
    }

    pub fn taxonomies(&self) -> &Loadable<Vec<CatalogEntry<TaxonomyId>>> {
        &self.taxonomies
    }

    pub fn objectives(&self) -> &Loadable<Vec<CatalogEntry<ObjectiveId>>> {
        &self.objectives
    }

    pub fn sectors(&self) -> &Loadable<Vec<CatalogEntry<SectorId>>> {
        &self.sectors
    }

    pub fn activities(&self) -> &Loadable<Vec<CatalogEntry<ActivityId>>> {
        &self.activities
    }

    /// Verdict computed on the last entry to the results step; cleared by any input change.
    pub fn outcome(&self) -> Option<&ReviewOutcome> {
        self.outcome.as_ref()
    }

    /// Apply one input, returning the fetches the new state is waiting for.
    ///
    /// The results step shows a computed verdict and takes no input.
    pub fn apply(&mut self, event: ReviewEvent) -> Result<Vec<FetchRequest>, WizardError> {
        if self.step == ReviewStep::Results {
            return Err(WizardError::ResultsLocked);
        }

        match event {
            ReviewEvent::UpdateProject { project } => {
                self.project = project;
                Ok(Vec::new())
            }
            ReviewEvent::SelectTaxonomy { choice } => self.select_taxonomy(choice),
            ReviewEvent::SelectObjective { choice } => self.select_objective(choice),
            ReviewEvent::SelectSector { choice } => self.select_sector(choice),
            ReviewEvent::SelectActivity { choice } => self.select_activity(choice),
            ReviewEvent::AnswerThreshold { met } => {
                self.require_sc_type(ScCriteriaType::Threshold)?;
                self.answers.threshold_met = met;
                self.invalidate_outcome();
                Ok(Vec::new())
            }
            ReviewEvent::ChooseTrafficLight { light } => {
                self.require_sc_type(ScCriteriaType::TrafficLight)?;
                self.answers.traffic_choice = Some(light);
                self.invalidate_outcome();
                Ok(Vec::new())
            }
            ReviewEvent::AnswerTrafficChoice { met } => {
                self.require_sc_type(ScCriteriaType::TrafficLight)?;
                if !matches!(
                    self.answers.traffic_choice,
                    Some(TrafficLight::Green) | Some(TrafficLight::Amber)
                ) {
                    return Err(WizardError::TrafficChoiceRequired);
                }
                self.answers.traffic_choice_met = met;
                self.invalidate_outcome();
                Ok(Vec::new())
            }
            ReviewEvent::AnswerDnsh { category, met } => {
                self.answer_dnsh(category, met)?;
                Ok(Vec::new())
            }
            ReviewEvent::AnswerMinimumSafeguards { met } => {
                self.loaded_criteria()?;
                self.answers.minimum_safeguards_met = met;
                self.invalidate_outcome();
                Ok(Vec::new())
            }
        }
    }

    /// Deliver a fetched response; responses for a superseded selection are discarded.
    pub fn receive(
        &mut self,
        request: &FetchRequest,
        response: FetchResponse,
    ) -> Result<Delivery, WizardError> {
        if !self.awaits(request) {
            return Ok(Delivery::Discarded);
        }

        match (request, response) {
            (FetchRequest::Taxonomies, FetchResponse::Taxonomies(items)) => {
                self.taxonomies = Loadable::Ready(items);
            }
            (FetchRequest::Objectives { .. }, FetchResponse::Objectives(items)) => {
                self.objectives = Loadable::Ready(items);
            }
            (FetchRequest::Sectors { .. }, FetchResponse::Sectors(items)) => {
                self.sectors = Loadable::Ready(items);
            }
            (FetchRequest::Activities { .. }, FetchResponse::Activities(items)) => {
                self.activities = Loadable::Ready(items);
            }
            (FetchRequest::Criteria { .. }, FetchResponse::Criteria(criteria)) => {
                self.answers = Answers::for_criteria(&criteria);
                self.criteria = Loadable::Ready(criteria);
                self.invalidate_outcome();
            }
            (request, _) => return Err(WizardError::MismatchedResponse(request_label(request))),
        }

        Ok(Delivery::Applied)
    }

    /// Whether the current step's requirements are satisfied.
    pub fn can_advance(&self) -> bool {
        match self.step {
            ReviewStep::ProjectInfo => true,
            ReviewStep::Taxonomy => self.selection.taxonomy.selected().is_some(),
            ReviewStep::Objective => self.selection.objective.selected().is_some(),
            ReviewStep::Sector => self.selection.sector.is_answered(),
            ReviewStep::Activity => {
                self.selection.sector.is_none_found() || self.selection.activity.is_answered()
            }
            ReviewStep::Assessment => {
                if self.selection.is_unmatched() {
                    return true;
                }
                match self.criteria.ready() {
                    None => false,
                    Some(criteria) => match criteria.substantial_contribution_type {
                        ScCriteriaType::TrafficLight => self.answers.traffic_choice.is_some(),
                        ScCriteriaType::Threshold => true,
                    },
                }
            }
            ReviewStep::Results => false,
        }
    }

    /// Move to the next step; entering results recomputes the verdict.
    pub fn advance(&mut self) -> Result<ReviewStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AlreadyComplete)?;
        if !self.can_advance() {
            return Err(WizardError::CannotAdvance(self.step));
        }

        if next == ReviewStep::Results {
            let outcome = assess(&self.selection, self.criteria.ready(), &self.answers)
                .ok_or(WizardError::CriteriaNotLoaded)?;
            self.outcome = Some(outcome);
        }

        self.step = next;
        Ok(next)
    }

    /// Move back one step; nothing entered so far is lost.
    pub fn back(&mut self) -> ReviewStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            project: self.project.display_name().to_string(),
            region: non_empty(&self.project.region),
            description: non_empty(&self.project.description),
            taxonomy: resolve_name(&self.selection.taxonomy, &self.taxonomies),
            objective: resolve_name(&self.selection.objective, &self.objectives),
            sector: resolve_name(&self.selection.sector, &self.sectors),
            activity: resolve_name(&self.selection.activity, &self.activities),
            outcome: self.outcome.clone(),
        }
    }

    fn select_taxonomy(
        &mut self,
        choice: Choice<TaxonomyId>,
    ) -> Result<Vec<FetchRequest>, WizardError> {
        if choice.is_none_found() {
            return Err(WizardError::NoneFoundNotOffered { field: "taxonomy" });
        }
        if let Choice::Selected(id) = choice {
            ensure_offered("taxonomy", id.0, &self.taxonomies, |entry| entry.id == id)?;
        }
        if choice == self.selection.taxonomy {
            return Ok(Vec::new());
        }

        self.selection.taxonomy = choice;
        self.reset_after(SelectionField::Taxonomy);

        Ok(match choice {
            Choice::Selected(taxonomy) => {
                self.objectives = Loadable::Loading;
                vec![FetchRequest::Objectives { taxonomy }]
            }
            _ => Vec::new(),
        })
    }

    fn select_objective(
        &mut self,
        choice: Choice<ObjectiveId>,
    ) -> Result<Vec<FetchRequest>, WizardError> {
        if choice.is_none_found() {
            return Err(WizardError::NoneFoundNotOffered { field: "objective" });
        }
        let parent = self.selection.taxonomy;
        if let Choice::Selected(id) = choice {
            if parent.selected().is_none() {
                return Err(WizardError::ParentNotSelected {
                    field: "objective",
                    parent: "taxonomy",
                });
            }
            ensure_offered("objective", id.0, &self.objectives, |entry| entry.id == id)?;
        }
        if choice == self.selection.objective {
            return Ok(Vec::new());
        }

        self.selection.objective = choice;
        self.reset_after(SelectionField::Objective);

        Ok(match (parent, choice) {
            (Choice::Selected(taxonomy), Choice::Selected(objective)) => {
                self.sectors = Loadable::Loading;
                vec![FetchRequest::Sectors {
                    taxonomy,
                    objective,
                }]
            }
            _ => Vec::new(),
        })
    }

    fn select_sector(&mut self, choice: Choice<SectorId>) -> Result<Vec<FetchRequest>, WizardError> {
        if choice.is_answered() && self.selection.objective.selected().is_none() {
            return Err(WizardError::ParentNotSelected {
                field: "sector",
                parent: "objective",
            });
        }
        if let Choice::Selected(id) = choice {
            ensure_offered("sector", id.0, &self.sectors, |entry| entry.id == id)?;
        }
        if choice == self.selection.sector {
            return Ok(Vec::new());
        }

        self.selection.sector = choice;
        self.reset_after(SelectionField::Sector);

        Ok(
            match (self.selection.taxonomy, self.selection.objective, choice) {
                (Choice::Selected(taxonomy), Choice::Selected(objective), Choice::Selected(sector)) => {
                    self.activities = Loadable::Loading;
                    vec![FetchRequest::Activities {
                        taxonomy,
                        objective,
                        sector,
                    }]
                }
                _ => Vec::new(),
            },
        )
    }

    fn select_activity(
        &mut self,
        choice: Choice<ActivityId>,
    ) -> Result<Vec<FetchRequest>, WizardError> {
        if choice.is_answered() && self.selection.sector.selected().is_none() {
            return Err(WizardError::ParentNotSelected {
                field: "activity",
                parent: "sector",
            });
        }
        if let Choice::Selected(id) = choice {
            ensure_offered("activity", id.0, &self.activities, |entry| entry.id == id)?;
        }
        if choice == self.selection.activity {
            return Ok(Vec::new());
        }

        self.selection.activity = choice;
        self.reset_after(SelectionField::Activity);

        Ok(match choice {
            Choice::Selected(activity) => {
                self.criteria = Loadable::Loading;
                vec![FetchRequest::Criteria { activity }]
            }
            _ => Vec::new(),
        })
    }

    /// Clear everything that depends on `changed`; earlier fields are left alone.
    fn reset_after(&mut self, changed: SelectionField) {
        if changed < SelectionField::Objective {
            self.selection.objective = Choice::Unset;
            self.objectives = Loadable::Idle;
        }
        if changed < SelectionField::Sector {
            self.selection.sector = Choice::Unset;
            self.sectors = Loadable::Idle;
        }
        if changed < SelectionField::Activity {
            self.selection.activity = Choice::Unset;
            self.activities = Loadable::Idle;
        }
        self.criteria = Loadable::Idle;
        self.answers = Answers::default();
        self.invalidate_outcome();
    }

    fn invalidate_outcome(&mut self) {
        self.outcome = None;
    }

    fn loaded_criteria(&self) -> Result<&Criteria, WizardError> {
        if self.selection.is_unmatched() {
            return Err(WizardError::CriteriaNotLoaded);
        }
        self.criteria.ready().ok_or(WizardError::CriteriaNotLoaded)
    }

    fn require_sc_type(&self, expected: ScCriteriaType) -> Result<(), WizardError> {
        let criteria = self.loaded_criteria()?;
        if criteria.substantial_contribution_type == expected {
            Ok(())
        } else {
            Err(WizardError::WrongScType { expected })
        }
    }

    fn answer_dnsh(&mut self, category: DnshCategory, met: bool) -> Result<(), WizardError> {
        if !self.loaded_criteria()?.is_dnsh_present(category) {
            return Err(WizardError::DnshCategoryNotPresent(category));
        }
        self.answers.dnsh_met.insert(category, met);
        self.invalidate_outcome();
        Ok(())
    }

    /// A response is only wanted while its slot is loading for the selection it was issued for.
    fn awaits(&self, request: &FetchRequest) -> bool {
        let selection = &self.selection;
        match *request {
            FetchRequest::Taxonomies => self.taxonomies.is_loading(),
            FetchRequest::Objectives { taxonomy } => {
                self.objectives.is_loading() && selection.taxonomy == Choice::Selected(taxonomy)
            }
            FetchRequest::Sectors {
                taxonomy,
                objective,
            } => {
                self.sectors.is_loading()
                    && selection.taxonomy == Choice::Selected(taxonomy)
                    && selection.objective == Choice::Selected(objective)
            }
            FetchRequest::Activities {
                taxonomy,
                objective,
                sector,
            } => {
                self.activities.is_loading()
                    && selection.taxonomy == Choice::Selected(taxonomy)
                    && selection.objective == Choice::Selected(objective)
                    && selection.sector == Choice::Selected(sector)
            }
            FetchRequest::Criteria { activity } => {
                self.criteria.is_loading() && selection.activity == Choice::Selected(activity)
            }
        }
    }
}

/// Human-readable recap shown on the results step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub project: String,
    pub region: Option<String>,
    pub description: Option<String>,
    pub taxonomy: String,
    pub objective: String,
    pub sector: String,
    pub activity: String,
    pub outcome: Option<ReviewOutcome>,
}

fn ensure_offered<I>(
    field: &'static str,
    id: u64,
    options: &Loadable<Vec<CatalogEntry<I>>>,
    matches: impl Fn(&CatalogEntry<I>) -> bool,
) -> Result<(), WizardError> {
    let entries = options
        .ready()
        .ok_or(WizardError::OptionsNotLoaded { field })?;
    if entries.iter().any(matches) {
        Ok(())
    } else {
        Err(WizardError::UnknownOption { field, id })
    }
}

fn resolve_name<I: PartialEq>(choice: &Choice<I>, options: &Loadable<Vec<CatalogEntry<I>>>) -> String {
    match choice {
        Choice::NoneFound => "Not found".to_string(),
        Choice::Unset => "—".to_string(),
        Choice::Selected(id) => options
            .ready()
            .and_then(|entries| entries.iter().find(|entry| entry.id == *id))
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| "—".to_string()),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn request_label(request: &FetchRequest) -> &'static str {
    match request {
        FetchRequest::Taxonomies => "taxonomies",
        FetchRequest::Objectives { .. } => "objectives",
        FetchRequest::Sectors { .. } => "sectors",
        FetchRequest::Activities { .. } => "activities",
        FetchRequest::Criteria { .. } => "criteria",
    }
}
