use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) const REQUIRED_COLUMNS: [&str; 21] = [
    "taxonomy",
    "region",
    "environmental_objective",
    "economic_code",
    "sector",
    "taxonomy_code",
    "activity",
    "contribution_type",
    "description",
    "sc_criteria_type",
    "substantial_contribution_criteria",
    "non_eligibility_criteria",
    "sc_criteria_green",
    "sc_criteria_amber",
    "sc_criteria_red",
    "dnsh_climate_adaptation",
    "dnsh_water",
    "dnsh_circular_economy",
    "dnsh_pollution_prevention",
    "dnsh_biodiversity",
    "dnsh_land_management",
];

/// One spreadsheet row with every cell trimmed; blank cells are empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CatalogRow {
    #[serde(deserialize_with = "trimmed")]
    pub(crate) taxonomy: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) region: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) environmental_objective: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) economic_code: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) sector: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) taxonomy_code: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) activity: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) contribution_type: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) description: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) sc_criteria_type: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) substantial_contribution_criteria: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) non_eligibility_criteria: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) sc_criteria_green: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) sc_criteria_amber: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) sc_criteria_red: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) dnsh_climate_adaptation: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) dnsh_water: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) dnsh_circular_economy: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) dnsh_pollution_prevention: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) dnsh_biodiversity: String,
    #[serde(deserialize_with = "trimmed")]
    pub(crate) dnsh_land_management: String,
}

/// Parsed rows, or the list of required columns the header is missing.
pub(crate) enum ParsedRows {
    Rows(Vec<CatalogRow>),
    MissingColumns(Vec<String>),
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedRows, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Ok(ParsedRows::MissingColumns(missing));
    }

    csv_reader.set_headers(headers);

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<CatalogRow>() {
        rows.push(row?);
    }

    Ok(ParsedRows::Rows(rows))
}

fn normalize_header(value: &str) -> String {
    value.replace('\u{feff}', "").trim().to_ascii_lowercase()
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(|value| value.trim().to_string()).unwrap_or_default())
}

#[cfg(test)]
pub(crate) fn normalize_header_for_tests(value: &str) -> String {
    normalize_header(value)
}
