use crate::sorg::io_common::*;
use crate::sorg::*;
use course_checking::*;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;

// **** Structures for the race description file ****

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct RaceFile {
    name: Option<String>,
    #[serde(default)]
    courses: Vec<CourseFile>,
    #[serde(default)]
    groups: Vec<GroupFile>,
    #[serde(default)]
    persons: Vec<PersonFile>,
    #[serde(default)]
    results: Vec<ResultFile>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct CourseFile {
    name: String,
    #[serde(default)]
    controls: Vec<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct GroupFile {
    name: String,
    course: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct PersonFile {
    name: Option<String>,
    surname: Option<String>,
    bib: u32,
    card: Option<u32>,
    group: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct ResultFile {
    bib: Option<u32>,
    card: Option<u32>,
    #[serde(rename = "startTime")]
    start_time: Option<String>,
    #[serde(rename = "finishTime")]
    finish_time: Option<String>,
    #[serde(default)]
    splits: Vec<SplitFile>,
    status: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct SplitFile {
    code: JSValue,
    time: String,
}

pub fn read_race(path: &str) -> SorgResult<Race> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path.to_string(),
    })?;
    parse_race(&contents)
}

pub fn parse_race(contents: &str) -> SorgResult<Race> {
    let rf: RaceFile = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    to_race(&rf)
}

fn to_race(rf: &RaceFile) -> SorgResult<Race> {
    let mut race = Race::new(rf.name.as_deref().unwrap_or("race"));
    for cf in &rf.courses {
        let mut controls: Vec<CourseControl> = Vec::new();
        for c in &cf.controls {
            controls.push(read_control(c)?);
        }
        // A malformed template disqualifies every result on the course, so
        // it is worth a warning as early as loading time.
        if let Err(e) = validate_controls(&controls) {
            warn!("course {:?}: {}", cf.name, e);
        }
        race.add_course(Course {
            name: cf.name.clone(),
            controls,
        });
    }
    for gf in &rf.groups {
        let course = match &gf.course {
            None => None,
            Some(name) => match race.course_by_name(name) {
                Some(id) => Some(id),
                None => whatever!("group {:?} refers to an unknown course {:?}", gf.name, name),
            },
        };
        race.add_group(Group {
            name: gf.name.clone(),
            course,
        });
    }
    for pf in &rf.persons {
        let group = match &pf.group {
            None => None,
            Some(name) => match race.group_by_name(name) {
                Some(id) => Some(id),
                None => whatever!("competitor {} refers to an unknown group {:?}", pf.bib, name),
            },
        };
        race.add_person(Person {
            name: pf.name.clone().unwrap_or_default(),
            surname: pf.surname.clone().unwrap_or_default(),
            bib: pf.bib,
            card: pf.card,
            group,
        });
    }
    for rsf in &rf.results {
        let person = match (rsf.bib, rsf.card) {
            (Some(bib), _) => match race.person_by_bib(bib) {
                Some(id) => Some(id),
                None => whatever!("results refer to an unknown bib {}", bib),
            },
            (None, Some(card)) => {
                let found = race.person_by_card(card);
                if found.is_none() {
                    warn!("no competitor carries card {}", card);
                }
                found
            }
            (None, None) => {
                warn!("a result carries neither a bib nor a card");
                None
            }
        };
        let mut punches: Vec<Punch> = Vec::new();
        for split in &rsf.splits {
            let code = read_js_u32(&split.code)?;
            let time = match OTime::parse_hhmmss(&split.time) {
                Some(t) => t,
                None => whatever!("cannot parse punch time {:?}", split.time),
            };
            punches.push(Punch::new(code, time));
        }
        let status = match &rsf.status {
            Some(s) => parse_status(s)?,
            None => ResultStatus::None,
        };
        race.add_result(RaceResult {
            person,
            card: rsf.card,
            punches,
            start_time: opt_time(&rsf.start_time)?,
            finish_time: opt_time(&rsf.finish_time)?,
            status,
        });
    }
    Ok(race)
}

// Controls are written either as a bare code ("31" or 31) or as an object
// with a code and a leg length.
fn read_control(x: &JSValue) -> SorgResult<CourseControl> {
    match x {
        JSValue::String(s) => Ok(CourseControl::new(s)),
        JSValue::Number(n) => Ok(CourseControl::new(&n.to_string())),
        JSValue::Object(obj) => {
            let code = match obj.get("code") {
                Some(JSValue::String(s)) => s.clone(),
                Some(JSValue::Number(n)) => n.to_string(),
                _ => whatever!("a control object needs a code: {:?}", x),
            };
            let length = match obj.get("length") {
                None => None,
                Some(v) => Some(read_js_u32(v)?),
            };
            Ok(CourseControl { code, length })
        }
        _ => whatever!("cannot read a control from {:?}", x),
    }
}

pub fn parse_status(s: &str) -> SorgResult<ResultStatus> {
    match s {
        "none" => Ok(ResultStatus::None),
        "ok" => Ok(ResultStatus::Ok),
        "disqualified" => Ok(ResultStatus::Disqualified),
        "didNotFinish" => Ok(ResultStatus::DidNotFinish),
        "missingPunch" => Ok(ResultStatus::MissingPunch),
        _ => whatever!("unknown result status: {}", s),
    }
}
