mod parser;

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use super::domain::{
    Activity, ActivityId, ContributionType, CriteriaRecord, Region, Taxonomy, TaxonomyId,
};
use super::repository::{InMemoryCatalog, Upserted};
use super::validation::{validate_env_objective, validate_sc_type, ValidationError};
use crate::review::DnshCategory;
use parser::{CatalogRow, ParsedRows};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumns(Vec<String>),
    InvalidRow { row: usize, source: ValidationError },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::Json(err) => write!(f, "invalid catalog JSON data: {}", err),
            CatalogImportError::MissingColumns(columns) => {
                write!(f, "missing required columns: {}", columns.join(", "))
            }
            CatalogImportError::InvalidRow { row, source } => {
                write!(f, "row {}: {}", row, source)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Json(err) => Some(err),
            CatalogImportError::MissingColumns(_) => None,
            CatalogImportError::InvalidRow { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for CatalogImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// How rows with values outside the canonical lists are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Keep the row as written and count a warning.
    #[default]
    Lenient,
    /// Abort the import on the first such row.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub activities_created: usize,
    pub activities_updated: usize,
    pub warnings: usize,
}

pub struct CatalogImporter;

impl CatalogImporter {
    /// Load a catalog from disk; `.json` files are read as snapshots, everything else as CSV.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        mode: ImportMode,
    ) -> Result<(InMemoryCatalog, ImportSummary), CatalogImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let catalog = Self::from_json_reader(file)?;
            let summary = ImportSummary {
                activities_created: catalog.activity_count(),
                ..ImportSummary::default()
            };
            Ok((catalog, summary))
        } else {
            let mut catalog = InMemoryCatalog::default();
            let summary = Self::import_csv(file, &mut catalog, mode)?;
            Ok((catalog, summary))
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<InMemoryCatalog, CatalogImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Upsert every spreadsheet row into `catalog`.
    pub fn import_csv<R: Read>(
        reader: R,
        catalog: &mut InMemoryCatalog,
        mode: ImportMode,
    ) -> Result<ImportSummary, CatalogImportError> {
        let rows = match parser::parse_rows(reader)? {
            ParsedRows::Rows(rows) => rows,
            ParsedRows::MissingColumns(columns) => {
                return Err(CatalogImportError::MissingColumns(columns))
            }
        };

        let mut summary = ImportSummary::default();
        for (index, row) in rows.into_iter().enumerate() {
            // header is line 1
            let line = index + 2;
            summary.warnings += check_row(&row, line, mode)?;
            let upserted = apply_row(row, catalog);
            debug!(row = line, activity = %upserted.id(), "catalog row applied");
            match upserted {
                Upserted::Created(_) => summary.activities_created += 1,
                Upserted::Updated(_) => summary.activities_updated += 1,
            }
        }

        Ok(summary)
    }
}

fn check_row(row: &CatalogRow, line: usize, mode: ImportMode) -> Result<usize, CatalogImportError> {
    let mut problems = Vec::new();
    if let Err(err) = validate_env_objective(&row.environmental_objective) {
        problems.push(err);
    }
    if !row.sc_criteria_type.is_empty() {
        if let Err(err) = validate_sc_type(&row.sc_criteria_type.to_ascii_lowercase()) {
            problems.push(err);
        }
    }

    match mode {
        ImportMode::Strict => match problems.into_iter().next() {
            Some(source) => Err(CatalogImportError::InvalidRow { row: line, source }),
            None => Ok(0),
        },
        ImportMode::Lenient => {
            for problem in &problems {
                warn!(row = line, activity = %row.activity, %problem, "catalog row kept as written");
            }
            Ok(problems.len())
        }
    }
}

fn apply_row(row: CatalogRow, catalog: &mut InMemoryCatalog) -> Upserted<ActivityId> {
    let taxonomy_id = catalog.upsert_taxonomy(Taxonomy {
        id: TaxonomyId(0),
        name: row.taxonomy.clone(),
        description: String::new(),
        region: Region::from_label(&row.region),
        country_code: None,
    });
    let objective_id = catalog.objective_for(taxonomy_id, &row.environmental_objective);
    let sector_id = catalog.sector_for(taxonomy_id, objective_id, &row.sector);

    let sc_criteria_type = if row.sc_criteria_type.is_empty() {
        "threshold".to_string()
    } else {
        row.sc_criteria_type.to_ascii_lowercase()
    };

    let mut criteria = CriteriaRecord {
        sc_criteria_type,
        substantial_contribution_criteria: row.substantial_contribution_criteria,
        non_eligibility_criteria: row.non_eligibility_criteria,
        sc_criteria_green: row.sc_criteria_green,
        sc_criteria_amber: row.sc_criteria_amber,
        sc_criteria_red: row.sc_criteria_red,
        ..CriteriaRecord::default()
    };
    for (category, text) in [
        (DnshCategory::ClimateAdaptation, row.dnsh_climate_adaptation),
        (DnshCategory::Water, row.dnsh_water),
        (DnshCategory::CircularEconomy, row.dnsh_circular_economy),
        (DnshCategory::PollutionPrevention, row.dnsh_pollution_prevention),
        (DnshCategory::Biodiversity, row.dnsh_biodiversity),
        (DnshCategory::LandManagement, row.dnsh_land_management),
    ] {
        *criteria.dnsh_text_mut(category) = text;
    }

    catalog.upsert_activity(Activity {
        id: ActivityId(0),
        taxonomy_id,
        objective_id,
        sector_id,
        taxonomy_code: row.taxonomy_code,
        economic_code: row.economic_code,
        name: row.activity,
        description: row.description,
        contribution_type: ContributionType::from_label(&row.contribution_type),
        criteria,
    })
}
