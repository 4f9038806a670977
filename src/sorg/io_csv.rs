// Reading finish times recorded per bib in CSV files.
//
// Each row is "bib,time" with the time in the short pool notation MM:SS.hh.
// A header row is tolerated.

use crate::sorg::*;
use course_checking::pool_time::parse_pool_time;
use course_checking::*;
use log::{debug, warn};
use snafu::prelude::*;

pub fn read_times(path: &str) -> SorgResult<Vec<(u32, OTime)>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(CsvOpenSnafu {})?;
    records_to_times(rdr.into_records())
}

pub fn parse_times<R: std::io::Read>(data: R) -> SorgResult<Vec<(u32, OTime)>> {
    let rdr = csv::ReaderBuilder::new().has_headers(false).from_reader(data);
    records_to_times(rdr.into_records())
}

fn records_to_times<R: std::io::Read>(
    records: csv::StringRecordsIntoIter<R>,
) -> SorgResult<Vec<(u32, OTime)>> {
    let mut rows: Vec<(u32, OTime)> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("{:?} {:?}", lineno, line);
        let bib_raw = line.get(0).context(CsvLineTooShortSnafu { lineno })?;
        let bib = match bib_raw.trim().parse::<u32>() {
            Result::Ok(b) => b,
            Result::Err(_) if lineno == 1 => {
                debug!("skipping the header row {:?}", line);
                continue;
            }
            Result::Err(_) => {
                whatever!("times line {}: cannot read a bib number from {:?}", lineno, bib_raw)
            }
        };
        let time_raw = line.get(1).context(CsvLineTooShortSnafu { lineno })?;
        let time = match parse_pool_time(time_raw) {
            Some(t) => t,
            None => whatever!("times line {}: cannot parse time {:?}", lineno, time_raw),
        };
        rows.push((bib, time));
    }
    Ok(rows)
}

/// Applies finish times to the race, matching competitors by bib.
///
/// Competitors without a recorded result get a fresh one. Rows without a
/// matching competitor are dropped, their count is returned.
pub fn apply_times(race: &mut Race, rows: &[(u32, OTime)]) -> usize {
    let mut unmatched = 0;
    for (bib, time) in rows {
        let person = match race.person_by_bib(*bib) {
            Some(p) => p,
            None => {
                warn!("no competitor carries bib {}", bib);
                unmatched += 1;
                continue;
            }
        };
        match race.person_result_index(person) {
            Some(idx) => race.results[idx].finish_time = Some(*time),
            None => race.add_result(RaceResult {
                person: Some(person),
                finish_time: Some(*time),
                ..RaceResult::default()
            }),
        }
    }
    unmatched
}
