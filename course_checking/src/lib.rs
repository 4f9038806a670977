pub mod builder;
mod config;
pub mod levenshtein;
pub mod manual;
pub mod otime;
pub mod pool_time;
pub mod quick_start;

use log::{debug, info, warn};

pub use crate::config::*;
pub use crate::levenshtein::{levenshtein, levenshtein_with_costs, EditCosts};
pub use crate::otime::OTime;

// **** Course control templates ****

/// A parsed control code template.
///
/// Course setters write templates as strings on the course controls; the
/// checker parses a whole course once before walking the punches.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Template {
    /// A plain station code: `31`. The only form that can be malformed.
    Exact(u32),
    /// A code list such as `31(31,32,33)`: any listed code passes. The
    /// leading code is decorative; only the list decides membership, so
    /// `99(31,32)` does not accept 99.
    AnyOf(Vec<String>),
    /// `%`: any code passes.
    Wildcard,
    /// `%(31,32,33)`: any listed code passes.
    WildcardAnyOf(Vec<String>),
    /// `*`: any code not already used to pass an earlier control.
    UniqueVisit,
    /// `*(31,32,33)`: a listed code not already used to pass an earlier
    /// control. Unlisted codes are skipped without a uniqueness test.
    UniqueVisitAnyOf(Vec<String>),
}

impl Template {
    /// Parses one control code template.
    ///
    /// Text after the `%`/`*` marker or after the primary code is decorative:
    /// `*33` is a plain unique-visit marker. Only a template with no marker
    /// and no list must parse as an integer.
    pub fn parse(raw: &str) -> Result<Template, CheckerErrors> {
        let list = Template::code_list(raw);
        if raw.starts_with('%') {
            return Ok(match list {
                Some(l) => Template::WildcardAnyOf(l),
                None => Template::Wildcard,
            });
        }
        if raw.starts_with('*') {
            return Ok(match list {
                Some(l) => Template::UniqueVisitAnyOf(l),
                None => Template::UniqueVisit,
            });
        }
        if let Some(l) = list {
            return Ok(Template::AnyOf(l));
        }
        raw.trim()
            .parse::<u32>()
            .map(Template::Exact)
            .map_err(|_| CheckerErrors::MalformedTemplate(raw.to_string()))
    }

    // A list exists only when the first '(' sits at index >= 1 and a ')'
    // sits at index >= 1. Segments keep their raw spelling: ' 32' is not
    // the code 32.
    fn code_list(raw: &str) -> Option<Vec<String>> {
        let begin = raw.find('(')?;
        let end = raw.find(')')?;
        if begin == 0 || end == 0 {
            return None;
        }
        let inner = if begin + 1 <= end {
            &raw[begin + 1..end]
        } else {
            ""
        };
        Some(inner.split(',').map(str::to_string).collect())
    }
}

fn list_contains(list: &[String], code: u32) -> bool {
    let s = code.to_string();
    list.iter().any(|seg| *seg == s)
}

fn parse_course(controls: &[CourseControl]) -> Result<Vec<Template>, CheckerErrors> {
    controls.iter().map(|c| Template::parse(&c.code)).collect()
}

/// Checks that every template of a course parses.
///
/// The matcher treats a malformed template as "course not satisfied"; this
/// surfaces the reason, for preflighting courses at load time.
pub fn validate_controls(controls: &[CourseControl]) -> Result<(), CheckerErrors> {
    for control in controls {
        Template::parse(&control.code)?;
    }
    Ok(())
}

// **** Punch sequence checking ****

/// Checks a punch sequence against the ordered controls of a course.
///
/// Arguments:
/// * `punches` the punches read from the card, in recorded order
/// * `controls` the course controls, whose codes follow the template grammar
///
/// Walks the punches once with a cursor over the controls. A punch that does
/// not fit the current template is skipped; skipping is never fatal. The
/// course is satisfied the moment every control has been passed, even with
/// punches left over. An empty course is trivially satisfied. A malformed
/// template makes the whole course unsatisfiable; it never raises.
pub fn check(punches: &[Punch], controls: &[CourseControl]) -> bool {
    if controls.is_empty() {
        return true;
    }
    let templates = match parse_course(controls) {
        Ok(ts) => ts,
        Err(e) => {
            warn!("cannot check against this course: {}", e);
            return false;
        }
    };
    let mut cursor = 0;
    for punch in punches {
        let code = punch.code;
        match &templates[cursor] {
            Template::Exact(c) => {
                if code == *c {
                    cursor += 1;
                }
            }
            Template::AnyOf(list) => {
                if list_contains(list, code) {
                    cursor += 1;
                }
            }
            Template::Wildcard => cursor += 1,
            Template::WildcardAnyOf(list) => {
                if list_contains(list, code) {
                    cursor += 1;
                }
            }
            Template::UniqueVisit => {
                if first_visit(punches, cursor, code) {
                    cursor += 1;
                }
            }
            Template::UniqueVisitAnyOf(list) => {
                if list_contains(list, code) && first_visit(punches, cursor, code) {
                    cursor += 1;
                }
            }
        }
        if cursor == templates.len() {
            return true;
        }
    }
    false
}

// The uniqueness window is the first `cursor` punches, not everything before
// the current punch: punches that were skipped past the cursor do not count
// as visits.
fn first_visit(punches: &[Punch], cursor: usize, code: u32) -> bool {
    punches[..cursor].iter().all(|p| p.code != code)
}

// **** Result classification ****

/// Resolves the course a result should be checked against, through its
/// person's group.
pub fn result_course<'a>(race: &'a Race, result: &RaceResult) -> Option<&'a Course> {
    let person = race.person(result.person?);
    let group = race.group(person.group?);
    Some(race.course(group.course?))
}

/// Checks a result against the course of its person's group.
///
/// A result that cannot be tied to a course, because it has no person, the
/// person has no group or the group has no course, is accepted.
pub fn check_result(race: &Race, result: &RaceResult) -> bool {
    match result_course(race, result) {
        Some(course) => check(&result.punches, &course.controls),
        None => true,
    }
}

/// Computes the status of one result.
///
/// A result with no person attached cannot be classified; that is a hard
/// error, distinct from any status. Otherwise the course check decides
/// between `Ok` and `Disqualified`, and a missing or zero finish time
/// overrides either to `DidNotFinish`.
pub fn classify_result(race: &Race, result: &RaceResult) -> Result<ResultStatus, CheckerErrors> {
    if result.person.is_none() {
        return Err(CheckerErrors::NoPersonAssociated);
    }
    let mut status = if check_result(race, result) {
        ResultStatus::Ok
    } else {
        ResultStatus::Disqualified
    };
    if result.finish_time.map_or(true, |t| t.is_zero()) {
        status = ResultStatus::DidNotFinish;
    }
    Ok(status)
}

/// Rechecks every result of a race and assigns the statuses.
///
/// Results without a person are left untouched and counted; an unmatched
/// card readout is not a reason to abort the pass.
pub fn recheck_all(race: &mut Race) -> RecheckStats {
    let mut stats = RecheckStats {
        total: race.results.len(),
        ..RecheckStats::default()
    };
    info!("Checking {} results", stats.total);
    for idx in 0..race.results.len() {
        match classify_result(race, &race.results[idx]) {
            Ok(status) => {
                race.results[idx].status = status;
                debug!("result {}: {}", idx, status);
                match status {
                    ResultStatus::Ok => stats.ok += 1,
                    ResultStatus::Disqualified => stats.disqualified += 1,
                    ResultStatus::DidNotFinish => stats.did_not_finish += 1,
                    _ => {}
                }
            }
            Err(e) => {
                warn!("result {} left unchecked: {}", idx, e);
                stats.no_person += 1;
            }
        }
    }
    stats
}

/// Finds groups for results that came in with a missing-punch status.
///
/// For every such result with a person, the groups are tried in race order
/// and the first group whose course the punches satisfy wins: the person
/// moves to that group and the result becomes `Ok`. Returns the number of
/// recovered results.
pub fn recover_groups(race: &mut Race) -> usize {
    let mut moves: Vec<(usize, PersonId, GroupId)> = Vec::new();
    for (idx, result) in race.results.iter().enumerate() {
        if result.status != ResultStatus::MissingPunch {
            continue;
        }
        let person_id = match result.person {
            Some(p) => p,
            None => continue,
        };
        let found = race.groups.iter().enumerate().find_map(|(gi, group)| {
            let course = race.course(group.course?);
            if check(&result.punches, &course.controls) {
                Some(GroupId(gi as u32))
            } else {
                None
            }
        });
        if let Some(gid) = found {
            moves.push((idx, person_id, gid));
        }
    }
    for (idx, person_id, gid) in &moves {
        race.persons[person_id.0 as usize].group = Some(*gid);
        race.results[*idx].status = ResultStatus::Ok;
        debug!(
            "result {}: person moved to group {}",
            idx,
            race.group(*gid).name
        );
    }
    moves.len()
}

// **** Split alignment ****

/// The edit distance between the punched codes and the expected codes of a
/// course, for courses made of plain station codes only.
///
/// Courses with wildcard, unique-visit or list templates have no single
/// expected code sequence and yield `None`.
pub fn course_deviation(
    punches: &[Punch],
    controls: &[CourseControl],
    costs: &EditCosts,
) -> Option<u64> {
    let mut expected: Vec<u32> = Vec::with_capacity(controls.len());
    for control in controls {
        match Template::parse(&control.code) {
            Ok(Template::Exact(code)) => expected.push(code),
            _ => return None,
        }
    }
    let punched: Vec<u32> = punches.iter().map(|p| p.code).collect();
    Some(levenshtein_with_costs(&punched, &expected, costs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn punches(codes: &[u32]) -> Vec<Punch> {
        codes
            .iter()
            .enumerate()
            .map(|(i, c)| Punch::new(*c, OTime::new(10, i as u64, 0, 0)))
            .collect()
    }

    fn controls(codes: &[&str]) -> Vec<CourseControl> {
        codes.iter().map(|c| CourseControl::new(c)).collect()
    }

    #[test]
    fn parse_plain_code() {
        assert_eq!(Template::parse("31"), Ok(Template::Exact(31)));
        assert_eq!(Template::parse(" 31 "), Ok(Template::Exact(31)));
    }

    #[test]
    fn parse_markers() {
        assert_eq!(Template::parse("%"), Ok(Template::Wildcard));
        assert_eq!(Template::parse("*"), Ok(Template::UniqueVisit));
        // Text after the marker is decorative.
        assert_eq!(Template::parse("*33"), Ok(Template::UniqueVisit));
        assert_eq!(Template::parse("%abc"), Ok(Template::Wildcard));
    }

    #[test]
    fn parse_lists() {
        assert_eq!(
            Template::parse("%(31,32)"),
            Ok(Template::WildcardAnyOf(vec![
                "31".to_string(),
                "32".to_string()
            ]))
        );
        assert_eq!(
            Template::parse("*(31)"),
            Ok(Template::UniqueVisitAnyOf(vec!["31".to_string()]))
        );
        assert_eq!(
            Template::parse("99(31,32)"),
            Ok(Template::AnyOf(vec!["31".to_string(), "32".to_string()]))
        );
        // Segments keep their raw spelling.
        assert_eq!(
            Template::parse("31( 32,33)"),
            Ok(Template::AnyOf(vec![" 32".to_string(), "33".to_string()]))
        );
    }

    #[test]
    fn parse_malformed() {
        assert_eq!(
            Template::parse("31 989"),
            Err(CheckerErrors::MalformedTemplate("31 989".to_string()))
        );
        assert_eq!(
            Template::parse(""),
            Err(CheckerErrors::MalformedTemplate("".to_string()))
        );
        // A leading '(' does not start a list.
        assert_eq!(
            Template::parse("(31)"),
            Err(CheckerErrors::MalformedTemplate("(31)".to_string()))
        );
        // A ')' before the '(' leaves an empty list extraction.
        assert_eq!(
            Template::parse(")31("),
            Err(CheckerErrors::MalformedTemplate(")31(".to_string()))
        );
    }

    #[test]
    fn empty_controls_always_satisfied() {
        assert!(check(&punches(&[]), &[]));
        assert!(check(&punches(&[31, 32]), &[]));
    }

    #[test]
    fn empty_punches_not_satisfied() {
        assert!(!check(&[], &controls(&["31"])));
    }

    #[test]
    fn exact_codes_skip_other_punches() {
        let course = controls(&["31", "32"]);
        assert!(check(&punches(&[99, 31, 15, 32]), &course));
        assert!(!check(&punches(&[31, 33]), &course));
    }

    #[test]
    fn wildcard_always_advances() {
        assert!(check(&punches(&[1, 2]), &controls(&["%", "%"])));
        assert!(check(&punches(&[31, 99]), &controls(&["31", "%"])));
    }

    #[test]
    fn wildcard_list_only_accepts_listed_codes() {
        let course = controls(&["%(31,32)"]);
        assert!(check(&punches(&[33, 31]), &course));
        assert!(!check(&punches(&[33]), &course));
    }

    #[test]
    fn unique_visit_rejects_repeated_code() {
        let course = controls(&["31", "*"]);
        assert!(check(&punches(&[31, 32]), &course));
        assert!(!check(&punches(&[31, 31]), &course));
    }

    #[test]
    fn unique_visit_skip_is_not_fatal() {
        // The repeated 31 is skipped; a later fresh code still advances.
        let course = controls(&["31", "*", "42"]);
        assert!(check(&punches(&[31, 31, 55, 42]), &course));
    }

    #[test]
    fn unique_window_counts_matched_controls_only() {
        // The first two punches never advanced the cursor, so they are not
        // in the uniqueness window and the second 31 still counts as fresh.
        let course = controls(&["31", "42", "*"]);
        assert!(check(&punches(&[55, 66, 31, 42, 31]), &course));
    }

    #[test]
    fn unique_list_skips_unlisted_codes() {
        let course = controls(&["31", "*(31,32)"]);
        assert!(check(&punches(&[31, 32]), &course));
        assert!(!check(&punches(&[31, 31]), &course));
        // 40 is not listed: skipped without a uniqueness test.
        assert!(check(&punches(&[40, 31, 40, 32]), &course));
    }

    #[test]
    fn anyof_primary_code_is_decorative() {
        let course = controls(&["99(31,32)"]);
        assert!(check(&punches(&[31]), &course));
        assert!(check(&punches(&[32]), &course));
        assert!(!check(&punches(&[99]), &course));
    }

    #[test]
    fn list_membership_is_raw_string_equality() {
        let course = controls(&["31( 32,33)"]);
        assert!(!check(&punches(&[32]), &course));
        assert!(check(&punches(&[33]), &course));
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert!(!check(&punches(&[31]), &controls(&["31()"])));
    }

    #[test]
    fn malformed_template_rejects_whole_course() {
        assert!(!check(&punches(&[31]), &controls(&["31 989"])));
        assert!(!check(&punches(&[31]), &controls(&[""])));
        // Malformed even when the cursor would never reach it.
        assert!(!check(&punches(&[31]), &controls(&["31", "31 989"])));
    }

    #[test]
    fn early_success_ignores_trailing_punches() {
        // The trailing repeats would fail a uniqueness test, but the course
        // is already satisfied by then.
        let course = controls(&["31", "*"]);
        assert!(check(&punches(&[31, 32, 31, 31]), &course));
    }

    #[test]
    fn course_with_mixed_templates() {
        let course = controls(&["31", "%", "*33", "42"]);
        assert!(check(&punches(&[31, 99, 33, 33, 42]), &course));
        assert!(!check(&punches(&[31, 99, 33, 33]), &course));
    }

    #[test]
    fn validate_controls_reports_malformed() {
        assert!(
            validate_controls(&controls(&["31", "%", "*(31,32)"])).is_ok()
        );
        assert_eq!(
            validate_controls(&controls(&["31", "31 989"])),
            Err(CheckerErrors::MalformedTemplate("31 989".to_string()))
        );
    }

    // A race with one course, one group on it and one person in the group.
    fn one_person_race(course_codes: &[&str]) -> (Race, PersonId) {
        let mut race = Race::new("test race");
        let course = race.add_course(Course {
            name: "course 1".to_string(),
            controls: controls(course_codes),
        });
        let group = race.add_group(Group {
            name: "M21".to_string(),
            course: Some(course),
        });
        let person = race.add_person(Person {
            name: "John".to_string(),
            surname: "Doe".to_string(),
            bib: 12,
            card: Some(123456),
            group: Some(group),
        });
        (race, person)
    }

    fn finished_result(person: Option<PersonId>, codes: &[u32]) -> RaceResult {
        RaceResult {
            person,
            card: None,
            punches: punches(codes),
            start_time: Some(OTime::new(10, 0, 0, 0)),
            finish_time: Some(OTime::new(10, 35, 0, 0)),
            status: ResultStatus::None,
        }
    }

    #[test]
    fn classify_without_person_is_an_error() {
        let (race, _) = one_person_race(&["31"]);
        let result = finished_result(None, &[31]);
        assert_eq!(
            classify_result(&race, &result),
            Err(CheckerErrors::NoPersonAssociated)
        );
    }

    #[test]
    fn classify_satisfied_course() {
        let (race, person) = one_person_race(&["31", "32"]);
        let result = finished_result(Some(person), &[31, 32]);
        assert_eq!(classify_result(&race, &result), Ok(ResultStatus::Ok));
    }

    #[test]
    fn classify_unsatisfied_course() {
        let (race, person) = one_person_race(&["31", "32"]);
        let result = finished_result(Some(person), &[31, 33]);
        assert_eq!(
            classify_result(&race, &result),
            Ok(ResultStatus::Disqualified)
        );
    }

    #[test]
    fn missing_finish_overrides_both_ways() {
        let (race, person) = one_person_race(&["31"]);
        let mut satisfied = finished_result(Some(person), &[31]);
        satisfied.finish_time = None;
        assert_eq!(
            classify_result(&race, &satisfied),
            Ok(ResultStatus::DidNotFinish)
        );
        let mut unsatisfied = finished_result(Some(person), &[77]);
        unsatisfied.finish_time = Some(OTime::ZERO);
        assert_eq!(
            classify_result(&race, &unsatisfied),
            Ok(ResultStatus::DidNotFinish)
        );
    }

    #[test]
    fn person_without_group_is_accepted() {
        let mut race = Race::new("test race");
        let person = race.add_person(Person {
            name: "Jane".to_string(),
            surname: "Roe".to_string(),
            bib: 7,
            card: None,
            group: None,
        });
        let result = finished_result(Some(person), &[1, 2, 3]);
        assert!(check_result(&race, &result));
        assert_eq!(classify_result(&race, &result), Ok(ResultStatus::Ok));
    }

    #[test]
    fn group_without_course_is_accepted() {
        let mut race = Race::new("test race");
        let group = race.add_group(Group {
            name: "open".to_string(),
            course: None,
        });
        let person = race.add_person(Person {
            name: "Jane".to_string(),
            surname: "Roe".to_string(),
            bib: 7,
            card: None,
            group: Some(group),
        });
        let result = finished_result(Some(person), &[]);
        assert_eq!(classify_result(&race, &result), Ok(ResultStatus::Ok));
    }

    #[test]
    fn recheck_all_counts_and_assigns() {
        let (mut race, person) = one_person_race(&["31", "32"]);
        race.add_result(finished_result(Some(person), &[31, 32]));
        race.add_result(finished_result(Some(person), &[31, 77]));
        // An unmatched readout: stays unclassified.
        race.add_result(finished_result(None, &[31, 32]));
        let stats = recheck_all(&mut race);
        assert_eq!(
            stats,
            RecheckStats {
                total: 3,
                ok: 1,
                disqualified: 1,
                did_not_finish: 0,
                no_person: 1,
            }
        );
        assert_eq!(race.results[0].status, ResultStatus::Ok);
        assert_eq!(race.results[1].status, ResultStatus::Disqualified);
        assert_eq!(race.results[2].status, ResultStatus::None);
    }

    #[test]
    fn recover_groups_moves_person_to_matching_course() {
        let mut race = Race::new("test race");
        let course_a = race.add_course(Course {
            name: "A".to_string(),
            controls: controls(&["31", "32"]),
        });
        let course_b = race.add_course(Course {
            name: "B".to_string(),
            controls: controls(&["55", "56"]),
        });
        let group_a = race.add_group(Group {
            name: "M21".to_string(),
            course: Some(course_a),
        });
        let group_b = race.add_group(Group {
            name: "M35".to_string(),
            course: Some(course_b),
        });
        let person = race.add_person(Person {
            name: "John".to_string(),
            surname: "Doe".to_string(),
            bib: 12,
            card: None,
            group: Some(group_a),
        });
        let mut result = finished_result(Some(person), &[55, 56]);
        result.status = ResultStatus::MissingPunch;
        race.add_result(result);
        // Not a missing punch: must stay where it is.
        race.add_result(finished_result(Some(person), &[55, 56]));

        assert_eq!(recover_groups(&mut race), 1);
        assert_eq!(race.person(person).group, Some(group_b));
        assert_eq!(race.results[0].status, ResultStatus::Ok);
        assert_eq!(race.results[1].status, ResultStatus::None);
    }

    #[test]
    fn deviation_for_exact_courses() {
        let course = controls(&["31", "32", "33"]);
        assert_eq!(
            course_deviation(&punches(&[31, 99, 33]), &course, &EditCosts::DEFAULT),
            Some(1)
        );
        assert_eq!(
            course_deviation(&punches(&[31, 32, 33]), &course, &EditCosts::DEFAULT),
            Some(0)
        );
        assert_eq!(
            course_deviation(&punches(&[32, 33]), &course, &EditCosts::DEFAULT),
            Some(1)
        );
    }

    #[test]
    fn builder_rejects_unknown_names_and_bad_templates() {
        use crate::builder::RaceBuilder;
        let err = RaceBuilder::new("r").course("Long", &["31", "31 989"]);
        assert!(matches!(
            err,
            Err(CheckerErrors::MalformedTemplate(ref t)) if t == "31 989"
        ));
        let err = RaceBuilder::new("r").group("M21", Some("Long"));
        assert!(matches!(
            err,
            Err(CheckerErrors::UnknownCourse(ref n)) if n == "Long"
        ));
        let err = RaceBuilder::new("r").person("John", "Doe", 1, None, Some("M21"));
        assert!(matches!(
            err,
            Err(CheckerErrors::UnknownGroup(ref n)) if n == "M21"
        ));
    }

    #[test]
    fn deviation_undefined_for_template_courses() {
        let course = controls(&["31", "%"]);
        assert_eq!(
            course_deviation(&punches(&[31, 32]), &course, &EditCosts::DEFAULT),
            None
        );
    }
}
