// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use crate::otime::OTime;

/// Index of a course in a race. Only minted when a course is added to a race.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CourseId(pub(crate) u32);

/// Index of a group in a race.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct GroupId(pub(crate) u32);

/// Index of a person in a race.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct PersonId(pub(crate) u32);

/// A single record from an electronic punching card: the control station code
/// and the time the station was punched.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Punch {
    pub code: u32,
    pub time: OTime,
}

impl Punch {
    pub fn new(code: u32, time: OTime) -> Punch {
        Punch { code, time }
    }
}

/// One control of a course. The `code` field is a template, not necessarily a
/// plain station code: it may carry a list of alternatives or a wildcard
/// marker. See the grammar description in the `manual` module.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CourseControl {
    pub code: String,
    /// Leg length to this control in meters, when the course setter provided it.
    pub length: Option<u32>,
}

impl CourseControl {
    pub fn new(code: &str) -> CourseControl {
        CourseControl {
            code: code.to_string(),
            length: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Course {
    pub name: String,
    pub controls: Vec<CourseControl>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Group {
    pub name: String,
    pub course: Option<CourseId>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Person {
    pub name: String,
    pub surname: String,
    pub bib: u32,
    /// Number of the punching card assigned to this competitor.
    pub card: Option<u32>,
    pub group: Option<GroupId>,
}

impl Person {
    pub fn full_name(&self) -> String {
        if self.surname.is_empty() {
            self.name.clone()
        } else if self.name.is_empty() {
            self.surname.clone()
        } else {
            format!("{} {}", self.surname, self.name)
        }
    }
}

/// One attempt recorded for the race: the punches read out of a card together
/// with the times, and the status assigned by the checker.
///
/// A result may exist without a person: a card readout that could not be
/// matched to any competitor stays in the race until an operator assigns it.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RaceResult {
    pub person: Option<PersonId>,
    pub card: Option<u32>,
    pub punches: Vec<Punch>,
    pub start_time: Option<OTime>,
    pub finish_time: Option<OTime>,
    pub status: ResultStatus,
}

/// The full description of one race: the object graph is flat, with all
/// cross-references expressed as ids into the vectors below.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Race {
    pub name: String,
    pub courses: Vec<Course>,
    pub groups: Vec<Group>,
    pub persons: Vec<Person>,
    pub results: Vec<RaceResult>,
}

impl Race {
    pub fn new(name: &str) -> Race {
        Race {
            name: name.to_string(),
            courses: Vec::new(),
            groups: Vec::new(),
            persons: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn add_course(&mut self, course: Course) -> CourseId {
        self.courses.push(course);
        CourseId(self.courses.len() as u32 - 1)
    }

    pub fn add_group(&mut self, group: Group) -> GroupId {
        self.groups.push(group);
        GroupId(self.groups.len() as u32 - 1)
    }

    pub fn add_person(&mut self, person: Person) -> PersonId {
        self.persons.push(person);
        PersonId(self.persons.len() as u32 - 1)
    }

    pub fn add_result(&mut self, result: RaceResult) {
        self.results.push(result);
    }

    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id.0 as usize]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0 as usize]
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.persons[id.0 as usize]
    }

    pub fn course_by_name(&self, name: &str) -> Option<CourseId> {
        self.courses
            .iter()
            .position(|c| c.name == name)
            .map(|i| CourseId(i as u32))
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map(|i| GroupId(i as u32))
    }

    pub fn person_by_bib(&self, bib: u32) -> Option<PersonId> {
        self.persons
            .iter()
            .position(|p| p.bib == bib)
            .map(|i| PersonId(i as u32))
    }

    pub fn person_by_card(&self, card: u32) -> Option<PersonId> {
        self.persons
            .iter()
            .position(|p| p.card == Some(card))
            .map(|i| PersonId(i as u32))
    }

    /// The index of the first result attached to the given person, if any.
    pub fn person_result_index(&self, id: PersonId) -> Option<usize> {
        self.results.iter().position(|r| r.person == Some(id))
    }

    /// The first result attached to the given person, if any.
    pub fn find_person_result(&self, id: PersonId) -> Option<&RaceResult> {
        self.person_result_index(id).map(|i| &self.results[i])
    }
}

// ******** Output data structures *********

/// All the states a checked result can be in.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ResultStatus {
    /// Not checked yet.
    None,
    /// The punch sequence satisfies the course and a finish time was recorded.
    Ok,
    /// The punch sequence does not satisfy the course.
    Disqualified,
    /// No finish time was recorded. This overrides the course check either way.
    DidNotFinish,
    /// A control is missing. The checker never produces this state itself;
    /// it comes with imported data and drives group recovery.
    MissingPunch,
}

impl Default for ResultStatus {
    fn default() -> ResultStatus {
        ResultStatus::None
    }
}

impl Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultStatus::None => "None",
            ResultStatus::Ok => "OK",
            ResultStatus::Disqualified => "Disqualified",
            ResultStatus::DidNotFinish => "DidNotFinish",
            ResultStatus::MissingPunch => "MissingPunch",
        };
        write!(f, "{}", s)
    }
}

/// Counts from one full recheck pass over a race.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RecheckStats {
    pub total: usize,
    pub ok: usize,
    pub disqualified: usize,
    pub did_not_finish: usize,
    /// Results that could not be classified because no person is attached.
    pub no_person: usize,
}

/// Errors that prevent checking from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CheckerErrors {
    /// The hard failure of classifying a result that has no person attached.
    NoPersonAssociated,
    /// A control code template that cannot be understood. The matcher itself
    /// degrades to "not satisfied" instead of raising this; it surfaces only
    /// through explicit course validation.
    MalformedTemplate(String),
    /// A negative edit cost.
    InvalidCost(i64),
    /// A group refers to a course name that is not part of the race.
    UnknownCourse(String),
    /// A person refers to a group name that is not part of the race.
    UnknownGroup(String),
}

impl Error for CheckerErrors {}

impl Display for CheckerErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckerErrors::NoPersonAssociated => {
                write!(f, "no person associated with this result")
            }
            CheckerErrors::MalformedTemplate(t) => {
                write!(f, "malformed control code template {:?}", t)
            }
            CheckerErrors::InvalidCost(c) => write!(f, "invalid cost: {}", c),
            CheckerErrors::UnknownCourse(name) => write!(f, "unknown course {:?}", name),
            CheckerErrors::UnknownGroup(name) => write!(f, "unknown group {:?}", name),
        }
    }
}
