use super::super::domain::{Answers, Criteria, DnshCategory, ScCriteriaType, TrafficLight};

/// Substantial-contribution reading of the answers for the activity's SC style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScSignal {
    Threshold {
        met: bool,
    },
    TrafficLight {
        choice: Option<TrafficLight>,
        met: bool,
    },
}

pub(crate) struct ReviewSignals {
    pub sc: ScSignal,
    /// Answer per present DNSH category, canonical order.
    pub dnsh: Vec<(DnshCategory, bool)>,
    pub minimum_safeguards_met: bool,
}

impl ReviewSignals {
    /// Holds vacuously when the activity carries no DNSH criteria.
    pub fn dnsh_all_met(&self) -> bool {
        self.dnsh.iter().all(|(_, met)| *met)
    }
}

pub(crate) fn collect_signals(criteria: &Criteria, answers: &Answers) -> ReviewSignals {
    let sc = match criteria.substantial_contribution_type {
        ScCriteriaType::TrafficLight => {
            let met = match answers.traffic_choice {
                Some(TrafficLight::Green) | Some(TrafficLight::Amber) => answers.traffic_choice_met,
                Some(TrafficLight::Red) | None => false,
            };
            ScSignal::TrafficLight {
                choice: answers.traffic_choice,
                met,
            }
        }
        ScCriteriaType::Threshold => ScSignal::Threshold {
            met: answers.threshold_met,
        },
    };

    let dnsh = criteria
        .present_dnsh_categories()
        .into_iter()
        .map(|category| {
            let met = answers.dnsh_met.get(&category).copied().unwrap_or(false);
            (category, met)
        })
        .collect();

    ReviewSignals {
        sc,
        dnsh,
        minimum_safeguards_met: answers.minimum_safeguards_met,
    }
}
