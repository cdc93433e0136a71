mod policy;
mod rules;

pub use policy::{
    REASON_CRITERIA_NOT_MET, REASON_NO_MATCH, REASON_RED_SELECTED, REASON_THRESHOLD_ALIGNED,
    REASON_TRAFFIC_ALIGNED,
};

use super::domain::{Answers, Criteria, DnshCategory, Eligibility, Selection};
use serde::{Deserialize, Serialize};

/// Decide eligibility and alignment for a finished review.
///
/// Pure: the same inputs always produce the same outcome and nothing is mutated. A sentinel
/// sector or activity short-circuits to [`Eligibility::NotEligible`] without looking at the
/// criteria or answers. Unanswered questions count as not met.
pub fn evaluate(selection: &Selection, criteria: &Criteria, answers: &Answers) -> ReviewOutcome {
    if selection.is_unmatched() {
        return policy::not_eligible();
    }

    let signals = rules::collect_signals(criteria, answers);
    policy::decide_outcome(&signals)
}

/// Like [`evaluate`] for callers that may not have criteria yet.
///
/// Returns `None` only when a matched activity has no criteria loaded, which callers must
/// resolve before asking for a verdict.
pub fn assess(
    selection: &Selection,
    criteria: Option<&Criteria>,
    answers: &Answers,
) -> Option<ReviewOutcome> {
    if selection.is_unmatched() {
        return Some(policy::not_eligible());
    }
    criteria.map(|criteria| evaluate(selection, criteria, answers))
}

/// Which part of the rubric a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "group", content = "category")]
pub enum CriterionGroup {
    SubstantialContribution,
    Dnsh(DnshCategory),
    MinimumSafeguards,
}

/// One audited criterion, so a verdict can be explained line by line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionCheck {
    pub group: CriterionGroup,
    pub met: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub eligibility: Eligibility,
    pub reason: String,
    pub checks: Vec<CriterionCheck>,
}

impl ReviewOutcome {
    pub fn summary(&self) -> String {
        format!("{}: {}", self.eligibility.label(), self.reason)
    }

    pub fn unmet(&self) -> impl Iterator<Item = &CriterionCheck> {
        self.checks.iter().filter(|check| !check.met)
    }
}
