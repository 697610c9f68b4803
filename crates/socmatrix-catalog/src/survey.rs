//! Per-scope accumulation over fetched catalog payloads.
//!
//! A course fans out into its own scope plus campus locations, sections,
//! and each section's locations, meetings and instructors. Only list
//! entries that are JSON objects are observed.

use serde_json::{Map, Value};

use crate::fields::{FieldStats, Scope};

/// openSections indexes kept as samples for the report
pub const OPEN_SECTION_SAMPLES: usize = 5;

/// Python-style truthiness: null, false, 0, "" and empty containers are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// JSON-object entries of a list field; anything else yields nothing
fn objects<'v>(
    record: &'v Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'v Map<String, Value>> {
    record
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn has_truthy(record: &Map<String, Value>, key: &str) -> bool {
    record.get(key).is_some_and(is_truthy)
}

/// Everything accumulated over one run
#[derive(Debug, Clone)]
pub struct Survey {
    pub course: FieldStats,
    pub course_campus: FieldStats,
    pub section: FieldStats,
    pub section_campus: FieldStats,
    pub meeting: FieldStats,
    pub instructor: FieldStats,
    /// Courses with a truthy `campusLocations` (skipped by the course scope)
    pub courses_with_locations: usize,
    /// Sections with a truthy `meetingTimes` (skipped by the section scope)
    pub sections_with_meetings: usize,
    open_section_total: usize,
    open_section_samples: Vec<String>,
    skipped: usize,
}

impl Default for Survey {
    fn default() -> Self {
        Self::new()
    }
}

impl Survey {
    pub fn new() -> Self {
        Self {
            course: FieldStats::new(Scope::Course),
            course_campus: FieldStats::new(Scope::CourseCampusLocation),
            section: FieldStats::new(Scope::Section),
            section_campus: FieldStats::new(Scope::SectionCampusLocation),
            meeting: FieldStats::new(Scope::SectionMeeting),
            instructor: FieldStats::new(Scope::SectionInstructor),
            courses_with_locations: 0,
            sections_with_meetings: 0,
            open_section_total: 0,
            open_section_samples: Vec::new(),
            skipped: 0,
        }
    }

    /// Observe every course in a `courses` payload
    pub fn observe_courses(&mut self, courses: &[Value]) {
        for course in courses {
            match course.as_object() {
                Some(course) => self.observe_course(course),
                None => self.skipped += 1,
            }
        }
    }

    pub fn observe_course(&mut self, course: &Map<String, Value>) {
        self.course.observe(course);
        if has_truthy(course, "campusLocations") {
            self.courses_with_locations += 1;
        }
        for location in objects(course, "campusLocations") {
            self.course_campus.observe(location);
        }
        for section in objects(course, "sections") {
            self.observe_section(section);
        }
    }

    fn observe_section(&mut self, section: &Map<String, Value>) {
        self.section.observe(section);
        if has_truthy(section, "meetingTimes") {
            self.sections_with_meetings += 1;
        }
        for location in objects(section, "sectionCampusLocations") {
            self.section_campus.observe(location);
        }
        for meeting in objects(section, "meetingTimes") {
            self.meeting.observe(meeting);
        }
        for instructor in objects(section, "instructors") {
            self.instructor.observe(instructor);
        }
    }

    /// Tally an `openSections` payload; the first few indexes overall become samples
    pub fn observe_open_sections(&mut self, indexes: &[Value]) {
        self.open_section_total += indexes.len();
        let room = OPEN_SECTION_SAMPLES.saturating_sub(self.open_section_samples.len());
        self.open_section_samples
            .extend(indexes.iter().take(room).map(|idx| match idx {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }));
    }

    /// Accumulators in report order
    pub fn scopes(&self) -> [&FieldStats; 6] {
        [
            &self.course,
            &self.course_campus,
            &self.section,
            &self.section_campus,
            &self.meeting,
            &self.instructor,
        ]
    }

    /// Records observed for a scope; openSections counts indexes
    pub fn scope_total(&self, scope: Scope) -> usize {
        match scope {
            Scope::OpenSections => self.open_section_total,
            _ => self
                .scopes()
                .into_iter()
                .find(|s| s.scope() == scope)
                .map_or(0, FieldStats::total),
        }
    }

    pub fn open_section_total(&self) -> usize {
        self.open_section_total
    }

    pub fn open_section_samples(&self) -> &[String] {
        &self.open_section_samples
    }

    /// Top-level course entries that were not JSON objects
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn array(v: Value) -> Vec<Value> {
        match v {
            Value::Array(a) => a,
            other => panic!("not an array: {other}"),
        }
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(" ")));
        assert!(is_truthy(&json!([{}])));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn course_fans_out_into_scopes() {
        let mut survey = Survey::new();
        survey.observe_courses(&array(json!([{
            "subject": "198",
            "campusLocations": [{"code": "1", "description": "College Avenue"}],
            "sections": [{
                "index": "12345",
                "meetingTimes": [{"meetingDay": "M"}, {"meetingDay": "TH"}],
                "instructors": [{"name": "SMITH, J"}],
                "sectionCampusLocations": [{"description": "Busch"}]
            }, {
                "index": "12346",
                "meetingTimes": []
            }]
        }])));

        assert_eq!(survey.course.total(), 1);
        assert_eq!(survey.course_campus.total(), 1);
        assert_eq!(survey.section.total(), 2);
        assert_eq!(survey.meeting.total(), 2);
        assert_eq!(survey.instructor.total(), 1);
        assert_eq!(survey.section_campus.total(), 1);
        assert_eq!(survey.courses_with_locations, 1);
        assert_eq!(survey.sections_with_meetings, 1);
        assert!(!survey.course.contains("campusLocations"));
        assert!(!survey.section.contains("meetingTimes"));
        assert_eq!(survey.scope_total(Scope::SectionMeeting), 2);
    }

    #[test]
    fn non_object_entries_skipped() {
        let mut survey = Survey::new();
        survey.observe_courses(&array(json!([
            "not a course",
            {"subject": "640", "sections": ["x", {"index": "1"}], "campusLocations": [null]}
        ])));
        assert_eq!(survey.skipped(), 1);
        assert_eq!(survey.course.total(), 1);
        assert_eq!(survey.section.total(), 1);
        assert_eq!(survey.course_campus.total(), 0);
        // [null] is a non-empty list, so still counts as having locations
        assert_eq!(survey.courses_with_locations, 1);
    }

    #[test]
    fn open_section_samples_span_payloads() {
        let mut survey = Survey::new();
        survey.observe_open_sections(&array(json!(["00001", "00002", "00003"])));
        survey.observe_open_sections(&array(json!(["00004", "00005", "00006"])));
        survey.observe_open_sections(&array(json!(["00007"])));
        assert_eq!(survey.open_section_total(), 7);
        assert_eq!(
            survey.open_section_samples(),
            ["00001", "00002", "00003", "00004", "00005"]
        );
        assert_eq!(survey.scope_total(Scope::OpenSections), 7);
    }
}
