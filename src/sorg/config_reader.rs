use crate::sorg::*;
use course_checking::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;

// **** Structures for the configuration file ****

/// How the summary should be assembled and where it should go.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "raceName")]
    pub race_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "raceDate")]
    pub race_date: Option<String>,
    #[serde(rename = "raceLocation")]
    pub race_location: Option<String>,
    #[serde(rename = "showDeviations")]
    pub show_deviations: Option<bool>,
}

/// The header of the summary. All the counts are written as strings.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub race: String,
    pub date: Option<String>,
    pub location: Option<String>,
    pub total: String,
    pub ok: String,
    pub disqualified: String,
    #[serde(rename = "didNotFinish")]
    pub did_not_finish: String,
    #[serde(rename = "noPerson")]
    pub no_person: String,
}

/// A file to load into the race, tagged with the provider that reads it.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

/// The checking rules. The costs accept both numbers and quoted numbers.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckRules {
    #[serde(rename = "insertCost")]
    _insert_cost: Option<JSValue>,
    #[serde(rename = "deleteCost")]
    _delete_cost: Option<JSValue>,
    #[serde(rename = "replaceCost")]
    _replace_cost: Option<JSValue>,
    #[serde(rename = "recoverGroups")]
    pub recover_groups: Option<bool>,
    #[serde(rename = "rulesDescription")]
    pub rules_description: Option<String>,
}

impl CheckRules {
    /// The edit costs for deviation scoring, with every omitted cost at 1.
    pub fn edit_costs(&self) -> SorgResult<EditCosts> {
        let insert = read_js_cost(&self._insert_cost)?;
        let delete = read_js_cost(&self._delete_cost)?;
        let replace = read_js_cost(&self._replace_cost)?;
        match EditCosts::new(insert, delete, replace) {
            Result::Ok(c) => Ok(c),
            Result::Err(e) => whatever!("Checking error: {}", e),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "raceFileSources", default)]
    pub race_file_sources: Vec<FileSource>,
    pub rules: Option<CheckRules>,
}

pub fn read_config(path: &str) -> SorgResult<CheckConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path.to_string(),
    })?;
    let config: CheckConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a reference summary and puts it in the same shape as a calculated
/// summary: null deviations are dropped and the results are sorted.
pub fn read_summary(path: String) -> SorgResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningFileSnafu { path })?;
    let mut js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let mut results: Vec<JSValue> = js["results"].as_array().unwrap().clone();
    for entry in results.iter_mut() {
        let obj = entry.as_object_mut().unwrap();
        if obj.get("deviation").map_or(false, |v| v.is_null()) {
            obj.remove("deviation");
        }
    }
    results.sort_by_key(|e| summary_entry_key(e));
    js["results"] = JSValue::Array(results);
    Ok(js)
}

/// The sorting key of a summary entry. Entries without a person sort last.
pub fn summary_entry_key(entry: &JSValue) -> (u64, u64) {
    (
        entry["bib"].as_u64().unwrap_or(u64::MAX),
        entry["card"].as_u64().unwrap_or(u64::MAX),
    )
}

fn read_js_cost(v: &Option<JSValue>) -> SorgResult<i64> {
    match v {
        None => Ok(1),
        Some(JSValue::Number(n)) => n.as_i64().context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.trim().parse::<i64>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}
