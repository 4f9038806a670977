pub use crate::config::*;
use crate::validate_controls;

/// A builder for assembling a race by name.
///
/// Courses, groups and persons refer to each other by name while building;
/// the builder resolves the names to ids and validates the control code
/// templates on the way in.
///
/// ```
/// use course_checking::builder::RaceBuilder;
/// use course_checking::RaceResult;
/// # use course_checking::CheckerErrors;
///
/// let mut builder = RaceBuilder::new("Spring Cup")
///     .course("Long", &["31", "32", "%"])?
///     .group("M21", Some("Long"))?
///     .person("John", "Doe", 12, Some(2045678), Some("M21"))?;
///
/// builder.result(RaceResult {
///     card: Some(2045678),
///     ..RaceResult::default()
/// });
///
/// let race = builder.build();
/// assert_eq!(race.results.len(), 1);
///
/// # Ok::<(), CheckerErrors>(())
/// ```
pub struct RaceBuilder {
    pub(crate) _race: Race,
}

impl RaceBuilder {
    pub fn new(name: &str) -> RaceBuilder {
        RaceBuilder {
            _race: Race::new(name),
        }
    }

    /// Adds a course. The control codes must all parse as templates.
    pub fn course(mut self, name: &str, codes: &[&str]) -> Result<RaceBuilder, CheckerErrors> {
        let controls: Vec<CourseControl> = codes.iter().map(|c| CourseControl::new(c)).collect();
        validate_controls(&controls)?;
        self._race.add_course(Course {
            name: name.to_string(),
            controls,
        });
        Ok(self)
    }

    /// Adds a group, optionally tied to a course added before.
    pub fn group(mut self, name: &str, course: Option<&str>) -> Result<RaceBuilder, CheckerErrors> {
        let course = match course {
            Some(cname) => Some(self.find_course(cname)?),
            None => None,
        };
        self._race.add_group(Group {
            name: name.to_string(),
            course,
        });
        Ok(self)
    }

    /// Adds a person, optionally placed in a group added before.
    pub fn person(
        mut self,
        name: &str,
        surname: &str,
        bib: u32,
        card: Option<u32>,
        group: Option<&str>,
    ) -> Result<RaceBuilder, CheckerErrors> {
        let group = match group {
            Some(gname) => Some(self.find_group(gname)?),
            None => None,
        };
        self._race.add_person(Person {
            name: name.to_string(),
            surname: surname.to_string(),
            bib,
            card,
            group,
        });
        Ok(self)
    }

    /// Adds one recorded result.
    pub fn result(&mut self, result: RaceResult) {
        self._race.add_result(result);
    }

    pub fn build(self) -> Race {
        self._race
    }

    fn find_course(&self, name: &str) -> Result<CourseId, CheckerErrors> {
        self._race
            .course_by_name(name)
            .ok_or_else(|| CheckerErrors::UnknownCourse(name.to_string()))
    }

    fn find_group(&self, name: &str) -> Result<GroupId, CheckerErrors> {
        self._race
            .group_by_name(name)
            .ok_or_else(|| CheckerErrors::UnknownGroup(name.to_string()))
    }
}
