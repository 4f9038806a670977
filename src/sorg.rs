use log::{info, warn};

use course_checking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::sorg::config_reader::*;

pub mod config_reader;
pub mod io_backup;
pub mod io_common;
pub mod io_csv;
pub mod io_race;

#[derive(Debug, Snafu)]
pub enum SorgError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display(""))]
    ParsingJsonNumber {},
    #[snafu(display(""))]
    MissingParentDir {},
    #[snafu(display(""))]
    CsvOpen { source: csv::Error },
    #[snafu(display(""))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SorgResult<T> = Result<T, SorgError>;

fn results_to_json(race: &Race, costs: Option<&EditCosts>) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for result in race.results.iter() {
        let mut entry: JSMap<String, JSValue> = JSMap::new();
        if let Some(pid) = result.person {
            let person = race.person(pid);
            entry.insert("bib".to_string(), json!(person.bib));
            entry.insert("name".to_string(), json!(person.full_name()));
            if let Some(gid) = person.group {
                entry.insert("group".to_string(), json!(race.group(gid).name));
            }
        }
        if let Some(card) = result.card {
            entry.insert("card".to_string(), json!(card));
        }
        entry.insert("status".to_string(), json!(result.status.to_string()));
        if let Some(finish) = result.finish_time {
            entry.insert("finishTime".to_string(), json!(finish.to_string()));
        }
        if let Some(costs) = costs {
            if let Some(course) = result_course(race, result) {
                if let Some(d) = course_deviation(&result.punches, &course.controls, costs) {
                    entry.insert("deviation".to_string(), json!(d.to_string()));
                }
            }
        }
        l.push(JSValue::Object(entry));
    }
    l.sort_by_key(|e| summary_entry_key(e));
    l
}

fn build_summary_js(
    race: &Race,
    settings: &OutputSettings,
    stats: &RecheckStats,
    costs: Option<&EditCosts>,
) -> JSValue {
    let c = OutputConfig {
        race: race.name.clone(),
        date: settings.race_date.clone(),
        location: settings.race_location.clone(),
        total: stats.total.to_string(),
        ok: stats.ok.to_string(),
        disqualified: stats.disqualified.to_string(),
        did_not_finish: stats.did_not_finish.to_string(),
        no_person: stats.no_person.to_string(),
    };
    json!({
        "config": c,
        "results": results_to_json(race, costs) })
}

/// Runs the whole checking pipeline over the configured inputs.
///
/// Arguments:
/// * `args` the parsed command line
///
/// The race description is loaded first, then every readout and time source
/// is merged into it. Group recovery runs before the recheck when enabled.
/// The summary is printed, optionally written to a file and optionally
/// compared against a reference summary.
pub fn run_check(args: &Args) -> SorgResult<()> {
    let config: CheckConfig = match &args.config {
        Some(path) => read_config(path)?,
        None => CheckConfig::default(),
    };
    info!("config: {:?}", config);

    // Paths in the configuration file are relative to the file itself. Paths
    // given on the command line are used as they are.
    let root_p: PathBuf = match &args.config {
        Some(path) => Path::new(path)
            .parent()
            .context(MissingParentDirSnafu {})?
            .to_path_buf(),
        None => PathBuf::new(),
    };

    let mut sources: Vec<(PathBuf, String)> = Vec::new();
    if let Some(input) = &args.input {
        sources.push((PathBuf::from(input), "json".to_string()));
    }
    for cfs in &config.race_file_sources {
        let p: PathBuf = [root_p.clone(), PathBuf::from(cfs.file_path.clone())]
            .iter()
            .collect();
        sources.push((p, cfs.provider.clone()));
    }
    if let Some(readout) = &args.readout {
        sources.push((PathBuf::from(readout), "backup".to_string()));
    }
    if let Some(times) = &args.times {
        sources.push((PathBuf::from(times), "csv".to_string()));
    }

    let mut race: Option<Race> = None;
    for (path, provider) in &sources {
        let p2 = path.as_path().display().to_string();
        info!("Attempting to read race file {:?}", p2);
        match provider.as_str() {
            "json" => {
                if race.is_some() {
                    whatever!("a second race description {:?} cannot be merged", p2);
                }
                race = Some(io_race::read_race(&p2)?);
            }
            "backup" => match race.as_mut() {
                Some(r) => {
                    let readouts = io_backup::read_backup(&p2)?;
                    let unmatched = io_backup::merge_readouts(r, &readouts);
                    info!(
                        "Merged {} readouts from {:?}, {} without a competitor",
                        readouts.len(),
                        p2,
                        unmatched
                    );
                }
                None => whatever!("a race description must be loaded before {:?}", p2),
            },
            "csv" => match race.as_mut() {
                Some(r) => {
                    let rows = io_csv::read_times(&p2)?;
                    let unmatched = io_csv::apply_times(r, &rows);
                    info!(
                        "Merged {} times from {:?}, {} without a competitor",
                        rows.len(),
                        p2,
                        unmatched
                    );
                }
                None => whatever!("a race description must be loaded before {:?}", p2),
            },
            x => unimplemented!("Provider not implemented {:?}", x),
        }
    }
    let mut race = match race {
        Some(r) => r,
        None => whatever!("no race description provided, use --input or a config file"),
    };

    let output_settings = config.output_settings.clone().unwrap_or_default();
    if let Some(name) = &output_settings.race_name {
        race.name = name.clone();
    }

    let rules = config.rules.clone().unwrap_or_default();
    let costs = rules.edit_costs()?;
    if args.recover_groups || rules.recover_groups.unwrap_or(false) {
        let moved = recover_groups(&mut race);
        info!("Recovered a group for {} results", moved);
    }
    let stats = recheck_all(&mut race);
    info!(
        "Checked {} results: {} ok, {} disqualified, {} did not finish, {} without a person",
        stats.total, stats.ok, stats.disqualified, stats.did_not_finish, stats.no_person
    );

    let deviation_costs = if output_settings.show_deviations.unwrap_or(false) {
        Some(&costs)
    } else {
        None
    };
    let result_js = build_summary_js(&race, &output_settings, &stats, deviation_costs);

    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    println!("stats:{}", pretty_js_stats);

    let out_path: Option<String> = match &args.out {
        Some(p) if p == "stdout" => None,
        Some(p) => Some(p.clone()),
        None => output_settings.output_directory.as_ref().map(|d| {
            let p: PathBuf = [
                root_p.clone(),
                PathBuf::from(d.clone()),
                PathBuf::from("summary.json"),
            ]
            .iter()
            .collect();
            p.as_path().display().to_string()
        }),
    };
    if let Some(path) = out_path {
        fs::write(&path, &pretty_js_stats).context(WritingFileSnafu { path: path.clone() })?;
        info!("Wrote the summary to {:?}", path);
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p.clone())?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(&pretty_js_summary_ref, &pretty_js_stats, "\n");
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}
