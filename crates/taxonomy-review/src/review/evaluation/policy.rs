use super::super::domain::{Eligibility, TrafficLight};
use super::rules::{ReviewSignals, ScSignal};
use super::{CriterionCheck, CriterionGroup, ReviewOutcome};

pub const REASON_NO_MATCH: &str = "No matching sector or activity was selected.";
pub const REASON_RED_SELECTED: &str = "Red criteria selected.";
pub const REASON_CRITERIA_NOT_MET: &str = "One or more criteria not met (SC / DNSH / MS).";
pub const REASON_THRESHOLD_ALIGNED: &str = "Threshold criteria, DNSH, and minimum safeguards met.";
pub const REASON_TRAFFIC_ALIGNED: &str =
    "Selected traffic-light criteria, DNSH, and minimum safeguards met.";

pub(crate) fn not_eligible() -> ReviewOutcome {
    ReviewOutcome {
        eligibility: Eligibility::NotEligible,
        reason: REASON_NO_MATCH.to_string(),
        checks: Vec::new(),
    }
}

pub(crate) fn decide_outcome(signals: &ReviewSignals) -> ReviewOutcome {
    let (sc_met, sc_check, aligned_reason) = match signals.sc {
        ScSignal::TrafficLight {
            choice: Some(TrafficLight::Red),
            ..
        } => {
            // red never aligns; DNSH and safeguards are not looked at
            return ReviewOutcome {
                eligibility: Eligibility::EligibleNotAligned,
                reason: REASON_RED_SELECTED.to_string(),
                checks: vec![CriterionCheck {
                    group: CriterionGroup::SubstantialContribution,
                    met: false,
                    notes: "red traffic-light criteria selected".to_string(),
                }],
            };
        }
        ScSignal::TrafficLight { choice, met } => {
            let notes = match choice {
                Some(light) => format!(
                    "{} traffic-light criteria {}",
                    light.label().to_ascii_lowercase(),
                    if met { "met" } else { "not met" }
                ),
                None => "no traffic-light colour chosen".to_string(),
            };
            (
                met,
                CriterionCheck {
                    group: CriterionGroup::SubstantialContribution,
                    met,
                    notes,
                },
                REASON_TRAFFIC_ALIGNED,
            )
        }
        ScSignal::Threshold { met } => (
            met,
            CriterionCheck {
                group: CriterionGroup::SubstantialContribution,
                met,
                notes: if met {
                    "threshold criteria met".to_string()
                } else {
                    "threshold criteria not met".to_string()
                },
            },
            REASON_THRESHOLD_ALIGNED,
        ),
    };

    let mut checks = vec![sc_check];
    checks.extend(signals.dnsh.iter().map(|(category, met)| CriterionCheck {
        group: CriterionGroup::Dnsh(*category),
        met: *met,
        notes: format!(
            "{} DNSH criteria {}",
            category.label(),
            if *met { "met" } else { "not met" }
        ),
    }));
    checks.push(CriterionCheck {
        group: CriterionGroup::MinimumSafeguards,
        met: signals.minimum_safeguards_met,
        notes: if signals.minimum_safeguards_met {
            "minimum safeguards confirmed".to_string()
        } else {
            "minimum safeguards not confirmed".to_string()
        },
    });

    if sc_met && signals.dnsh_all_met() && signals.minimum_safeguards_met {
        ReviewOutcome {
            eligibility: Eligibility::Aligned,
            reason: aligned_reason.to_string(),
            checks,
        }
    } else {
        ReviewOutcome {
            eligibility: Eligibility::EligibleNotAligned,
            reason: REASON_CRITERIA_NOT_MET.to_string(),
            checks,
        }
    }
}
