// Reading of the append-only backup log written by the card readout station.
//
// Every readout is one block:
//
//   start
//   <card number>
//   <start time or an empty line>
//   <finish time or an empty line>
//   split_start
//   <code> <HH:MM:SS>
//   ...
//   split_end
//   end

use crate::sorg::*;
use course_checking::*;
use log::{debug, warn};
use snafu::prelude::*;
use std::fs;

/// One card readout from the backup log.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CardReadout {
    pub card: u32,
    pub start_time: Option<OTime>,
    pub finish_time: Option<OTime>,
    pub punches: Vec<Punch>,
}

pub fn read_backup(path: &str) -> SorgResult<Vec<CardReadout>> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path.to_string(),
    })?;
    parse_backup(&contents)
}

pub fn parse_backup(contents: &str) -> SorgResult<Vec<CardReadout>> {
    let lines: Vec<&str> = contents.lines().collect();
    let mut readouts: Vec<CardReadout> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].trim().is_empty() {
            i += 1;
            continue;
        }
        if lines[i].trim() != "start" {
            whatever!(
                "backup line {}: expected a block start, got {:?}",
                i + 1,
                lines[i]
            );
        }
        let card_raw = block_line(&lines, i + 1)?.trim();
        let card = match card_raw.parse::<u32>() {
            Result::Ok(c) => c,
            Result::Err(_) => whatever!(
                "backup line {}: cannot read a card number from {:?}",
                i + 2,
                card_raw
            ),
        };
        let start_time = header_time(&lines, i + 2)?;
        let finish_time = header_time(&lines, i + 3)?;
        if block_line(&lines, i + 4)?.trim() != "split_start" {
            whatever!("backup line {}: expected split_start", i + 5);
        }
        let mut punches: Vec<Punch> = Vec::new();
        let mut j = i + 5;
        while block_line(&lines, j)?.trim() != "split_end" {
            let raw = block_line(&lines, j)?;
            let mut parts = raw.split_whitespace();
            let code = match parts.next().map(|c| c.parse::<u32>()) {
                Some(Result::Ok(c)) => c,
                _ => whatever!(
                    "backup line {}: cannot read a control code from {:?}",
                    j + 1,
                    raw
                ),
            };
            let time = match parts.next().and_then(OTime::parse_hhmmss) {
                Some(t) => t,
                None => whatever!("backup line {}: missing punch time in {:?}", j + 1, raw),
            };
            punches.push(Punch::new(code, time));
            j += 1;
        }
        if block_line(&lines, j + 1)?.trim() != "end" {
            whatever!("backup line {}: expected the block end", j + 2);
        }
        debug!("readout: card {} with {} punches", card, punches.len());
        readouts.push(CardReadout {
            card,
            start_time,
            finish_time,
            punches,
        });
        i = j + 2;
    }
    Ok(readouts)
}

fn block_line<'a>(lines: &[&'a str], idx: usize) -> SorgResult<&'a str> {
    match lines.get(idx) {
        Some(l) => Ok(l),
        None => whatever!("backup ends inside a block at line {}", idx + 1),
    }
}

fn header_time(lines: &[&str], idx: usize) -> SorgResult<Option<OTime>> {
    let raw = block_line(lines, idx)?.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match OTime::parse_hhmmss(raw) {
        Some(t) => Ok(Some(t)),
        None => whatever!("backup line {}: cannot parse time {:?}", idx + 1, raw),
    }
}

/// Merges card readouts into the race, matching competitors by card number.
///
/// A competitor with a recorded result gets the punches replaced and the
/// start and finish times filled in when the readout has them. A competitor
/// without a result gets a fresh one. Readouts without a matching competitor
/// are kept as personless results, their count is returned.
pub fn merge_readouts(race: &mut Race, readouts: &[CardReadout]) -> usize {
    let mut unmatched = 0;
    for r in readouts {
        let person = race.person_by_card(r.card);
        if person.is_none() {
            warn!("no competitor carries card {}", r.card);
            unmatched += 1;
        }
        let existing = person.and_then(|p| race.person_result_index(p));
        match existing {
            Some(idx) => {
                let result = &mut race.results[idx];
                result.card = Some(r.card);
                result.punches = r.punches.clone();
                if r.start_time.is_some() {
                    result.start_time = r.start_time;
                }
                if r.finish_time.is_some() {
                    result.finish_time = r.finish_time;
                }
            }
            None => race.add_result(RaceResult {
                person,
                card: Some(r.card),
                punches: r.punches.clone(),
                start_time: r.start_time,
                finish_time: r.finish_time,
                status: ResultStatus::None,
            }),
        }
    }
    unmatched
}
