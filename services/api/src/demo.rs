use crate::cli::{CatalogArgs, EvaluateArgs};
use crate::infra::{load_catalog, InMemorySessionRepository};
use clap::Args;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use taxonomy_review::catalog::{
    decide_layout, sample_catalog, ActivityId, CatalogError, CatalogRepository, ImportMode,
    InMemoryCatalog, ObjectiveId, ObjectivesMatrix, SectorId, TaxonomyId,
};
use taxonomy_review::error::AppError;
use taxonomy_review::review::{
    Choice, DnshCategory, EvaluateRequest, ProjectInfo, ReviewEvent, ReviewOutcome, ReviewService,
    ReviewServiceError, ReviewStep, TrafficLight, WizardError,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print every audited criterion under each verdict
    #[arg(long)]
    pub(crate) show_checks: bool,
}

type DemoService = ReviewService<InMemoryCatalog, InMemorySessionRepository>;

struct Scenario {
    project: &'static str,
    events: Vec<ReviewEvent>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = ReviewService::new(
        Arc::new(sample_catalog()),
        Arc::new(InMemorySessionRepository::default()),
    );

    println!("Taxonomy review demo");
    for scenario in scenarios() {
        let outcome = walk(&service, scenario.project, scenario.events)?;
        println!("\n{}", scenario.project);
        render_outcome(&outcome, args.show_checks);
    }

    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        catalog,
        json,
    } = args;

    let raw = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&input)?
    };
    let request: EvaluateRequest = serde_json::from_str(&raw)?;

    let catalog = load_catalog(catalog.as_deref(), ImportMode::Lenient)?;
    let service = ReviewService::new(
        Arc::new(catalog),
        Arc::new(InMemorySessionRepository::default()),
    );
    let outcome = service.evaluate(request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_outcome(&outcome, true);
    }
    Ok(())
}

pub(crate) fn run_catalog_list(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = load_catalog(Some(&args.catalog), import_mode(args.strict))?;
    print!("{}", render_hierarchy(&catalog)?);
    Ok(())
}

pub(crate) fn run_catalog_matrix(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = load_catalog(Some(&args.catalog), import_mode(args.strict))?;
    let matrix = ObjectivesMatrix::build(&catalog).map_err(review_error)?;
    print!("{}", render_matrix(&matrix));
    Ok(())
}

fn import_mode(strict: bool) -> ImportMode {
    if strict {
        ImportMode::Strict
    } else {
        ImportMode::Lenient
    }
}

fn review_error(err: CatalogError) -> AppError {
    AppError::Review(ReviewServiceError::Catalog(err))
}

/// Run one scenario through a full session and return the verdict shown on the results step.
fn walk(
    service: &DemoService,
    project: &str,
    events: Vec<ReviewEvent>,
) -> Result<ReviewOutcome, AppError> {
    let session = service.start(ProjectInfo {
        name: project.to_string(),
        ..ProjectInfo::default()
    })?;
    for event in events {
        service.apply(&session.id, event)?;
    }

    let mut current = service.get(&session.id)?;
    while current.wizard.step() != ReviewStep::Results {
        current = service.advance(&session.id)?;
    }

    current
        .wizard
        .outcome()
        .cloned()
        .ok_or(AppError::Review(ReviewServiceError::Wizard(
            WizardError::CriteriaNotLoaded,
        )))
}

fn solar_path() -> Vec<ReviewEvent> {
    vec![
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
    ]
}

fn bus_path(light: TrafficLight) -> Vec<ReviewEvent> {
    vec![
        ReviewEvent::SelectTaxonomy {
            choice: Choice::Selected(TaxonomyId(2)),
        },
        ReviewEvent::SelectObjective {
            choice: Choice::Selected(ObjectiveId(3)),
        },
        ReviewEvent::SelectSector {
            choice: Choice::Selected(SectorId(2)),
        },
        ReviewEvent::SelectActivity {
            choice: Choice::Selected(ActivityId(2)),
        },
        ReviewEvent::ChooseTrafficLight { light },
    ]
}

fn scenarios() -> Vec<Scenario> {
    let compliant_solar = |safeguards: bool| {
        let mut events = solar_path();
        events.extend([
            ReviewEvent::AnswerThreshold { met: true },
            ReviewEvent::AnswerDnsh {
                category: DnshCategory::Water,
                met: true,
            },
            ReviewEvent::AnswerDnsh {
                category: DnshCategory::Biodiversity,
                met: true,
            },
            ReviewEvent::AnswerMinimumSafeguards { met: safeguards },
        ]);
        events
    };

    let mut green_buses = bus_path(TrafficLight::Green);
    green_buses.extend([
        ReviewEvent::AnswerTrafficChoice { met: true },
        ReviewEvent::AnswerMinimumSafeguards { met: true },
    ]);

    let mut red_buses = bus_path(TrafficLight::Red);
    red_buses.push(ReviewEvent::AnswerMinimumSafeguards { met: true });

    let mut unmatched = solar_path();
    unmatched.truncate(2);
    unmatched.push(ReviewEvent::SelectSector {
        choice: Choice::NoneFound,
    });

    vec![
        Scenario {
            project: "A. Rooftop solar, fully compliant",
            events: compliant_solar(true),
        },
        Scenario {
            project: "B. Rooftop solar, safeguards missing",
            events: compliant_solar(false),
        },
        Scenario {
            project: "C. Electric buses, green criteria met",
            events: green_buses,
        },
        Scenario {
            project: "D. Electric buses, red criteria",
            events: red_buses,
        },
        Scenario {
            project: "E. Data centre, no matching sector",
            events: unmatched,
        },
    ]
}

fn render_outcome(outcome: &ReviewOutcome, show_checks: bool) {
    println!("  {}", outcome.summary());
    if show_checks {
        for check in &outcome.checks {
            let mark = if check.met { "met" } else { "NOT MET" };
            println!("    - [{mark}] {}", check.notes);
        }
    }
}

fn render_hierarchy(catalog: &InMemoryCatalog) -> Result<String, AppError> {
    let mut out = String::new();
    for taxonomy in catalog.taxonomies().map_err(review_error)? {
        out.push_str(&format!(
            "{} [{}] ({})\n",
            taxonomy.name,
            taxonomy.id,
            taxonomy.region.label()
        ));
        for objective in catalog.objectives(taxonomy.id).map_err(review_error)? {
            out.push_str(&format!("  {}\n", objective.name));
            for sector in catalog
                .sectors(taxonomy.id, objective.id)
                .map_err(review_error)?
            {
                out.push_str(&format!("    {}\n", sector.name));
                for activity in catalog
                    .activities(taxonomy.id, objective.id, sector.id)
                    .map_err(review_error)?
                {
                    out.push_str(&format!(
                        "      {} {} [{}]",
                        activity.taxonomy_code,
                        activity.name,
                        activity.criteria.to_criteria().substantial_contribution_type
                    ));
                    let layout =
                        decide_layout(&objective.name, &activity.criteria.sc_criteria_type);
                    if !layout.columns().is_empty() {
                        out.push_str(&format!(" columns: {}", layout.columns()));
                    }
                    out.push('\n');
                }
            }
        }
    }
    Ok(out)
}

fn render_matrix(matrix: &ObjectivesMatrix) -> String {
    let mut out = format!("Taxonomy\t{}\n", matrix.objectives.join("\t"));
    for row in &matrix.rows {
        let cells: Vec<&str> = row
            .covered
            .iter()
            .map(|covered| if *covered { "x" } else { "-" })
            .collect();
        out.push_str(&format!("{}\t{}\n", row.taxonomy, cells.join("\t")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxonomy_review::review::Eligibility;

    #[test]
    fn reference_scenarios_reach_expected_verdicts() {
        let service = ReviewService::new(
            Arc::new(sample_catalog()),
            Arc::new(InMemorySessionRepository::default()),
        );

        let verdicts: Vec<Eligibility> = scenarios()
            .into_iter()
            .map(|scenario| {
                walk(&service, scenario.project, scenario.events)
                    .expect("scenario completes")
                    .eligibility
            })
            .collect();

        assert_eq!(
            verdicts,
            vec![
                Eligibility::Aligned,
                Eligibility::EligibleNotAligned,
                Eligibility::Aligned,
                Eligibility::EligibleNotAligned,
                Eligibility::NotEligible,
            ]
        );
    }

    #[test]
    fn hierarchy_lists_codes_and_sc_types() {
        let rendered = render_hierarchy(&sample_catalog()).expect("renders");

        assert!(rendered.contains("EU Taxonomy [1] (Europe)"));
        assert!(rendered.contains("      4.1 Electricity generation using solar photovoltaic technology [threshold]"));
        assert!(rendered.contains("[threshold] columns: substantial/non_eligibility\n"));
        assert!(rendered.contains("[traffic_light] columns: sc_criteria_*\n"));
    }

    #[test]
    fn matrix_marks_covered_objectives() {
        let matrix = ObjectivesMatrix::build(&sample_catalog()).expect("matrix builds");

        let rendered = render_matrix(&matrix);

        assert_eq!(
            rendered,
            "Taxonomy\tClimate mitigation\tWater\nEU Taxonomy\tx\tx\nASEAN Taxonomy\tx\t-\n"
        );
    }
}
