//! Curated mapping of catalog fields to planner functional requirements.
//!
//! Maintained by hand alongside the planner's requirement list; the
//! measured presence data never changes these entries.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::fields::Scope;

/// How a requirement is satisfied by a field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrStatus {
    /// Field is used as-is
    Direct,
    /// Value has to be computed from other fields
    Derived,
    /// API never returns it
    Missing,
}

impl FrStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Derived => "derived",
            Self::Missing => "missing",
        }
    }
}

impl std::fmt::Display for FrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite lookup key: report scope plus dotted field path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldKey<'a> {
    pub scope: Scope,
    pub field: &'a str,
}

impl<'a> FieldKey<'a> {
    pub const fn new(scope: Scope, field: &'a str) -> Self {
        Self { scope, field }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub key: FieldKey<'static>,
    pub fr_mapping: &'static str,
    pub status: FrStatus,
    pub notes: &'static str,
}

const fn direct(scope: Scope, field: &'static str, fr_mapping: &'static str) -> Annotation {
    Annotation {
        key: FieldKey::new(scope, field),
        fr_mapping,
        status: FrStatus::Direct,
        notes: "",
    }
}

const fn derived(scope: Scope, field: &'static str, fr_mapping: &'static str) -> Annotation {
    Annotation {
        key: FieldKey::new(scope, field),
        fr_mapping,
        status: FrStatus::Derived,
        notes: "",
    }
}

const FR_01_02: &str = "FR-01/FR-02";
const FR_02: &str = "FR-02";

pub const ANNOTATIONS: &[Annotation] = &[
    direct(Scope::Course, "subject", FR_01_02),
    direct(Scope::Course, "courseNumber", FR_01_02),
    direct(Scope::Course, "courseString", FR_01_02),
    direct(Scope::Course, "title", FR_01_02),
    direct(Scope::Course, "credits", FR_01_02),
    direct(Scope::Course, "offeringUnitCode", FR_01_02),
    Annotation {
        notes: "API returns null; derive from school/subject metadata.",
        ..derived(Scope::Course, "offeringUnitTitle", FR_01_02)
    },
    direct(Scope::Course, "school.code", FR_01_02),
    direct(Scope::Course, "school.description", FR_01_02),
    direct(Scope::Course, "coreCodes", FR_01_02),
    direct(Scope::Course, "preReqNotes", FR_01_02),
    direct(Scope::Course, "courseDescription", FR_02),
    derived(Scope::Course, "subjectDescription", FR_02),
    derived(Scope::Course, "synopsisUrl", FR_02),
    direct(Scope::Course, "openSections", FR_02),
    direct(Scope::Course, "campusLocations", FR_02),
    direct(Scope::CourseCampusLocation, "description", FR_02),
    direct(Scope::Section, "index", FR_01_02),
    direct(Scope::Section, "number", FR_01_02),
    direct(Scope::Section, "openStatus", FR_01_02),
    direct(Scope::Section, "openStatusText", FR_01_02),
    direct(Scope::Section, "instructorsText", FR_01_02),
    direct(Scope::Section, "crossListedSections", FR_02),
    direct(Scope::Section, "commentsText", FR_02),
    direct(Scope::Section, "examCode", FR_02),
    direct(Scope::Section, "examCodeText", FR_02),
    direct(Scope::Section, "meetingTimes", FR_02),
    direct(Scope::SectionCampusLocation, "description", FR_02),
    direct(Scope::SectionMeeting, "meetingDay", FR_02),
    direct(Scope::SectionMeeting, "startTimeMilitary", FR_02),
    direct(Scope::SectionMeeting, "endTimeMilitary", FR_02),
    direct(Scope::SectionMeeting, "campusName", FR_02),
    direct(Scope::SectionMeeting, "buildingCode", FR_02),
    direct(Scope::SectionMeeting, "roomNumber", FR_02),
    direct(Scope::SectionMeeting, "meetingModeDesc", FR_02),
    direct(Scope::SectionMeeting, "meetingModeCode", FR_02),
    direct(Scope::SectionInstructor, "name", FR_01_02),
    Annotation {
        notes: "Only exposes Index strings; need courses payload for metadata.",
        ..direct(Scope::OpenSections, "index", "FR-04")
    },
    Annotation {
        key: FieldKey::new(Scope::OpenSections, "capacity"),
        fr_mapping: "FR-02/FR-04",
        status: FrStatus::Missing,
        notes: "Capacity is not provided; must cross-reference sections for limits.",
    },
    Annotation {
        key: FieldKey::new(Scope::OpenSections, "notes"),
        fr_mapping: FR_02,
        status: FrStatus::Missing,
        notes: "No notes/status metadata returned with openSections indexes.",
    },
];

static BY_KEY: LazyLock<HashMap<FieldKey<'static>, &'static Annotation>> =
    LazyLock::new(|| ANNOTATIONS.iter().map(|a| (a.key, a)).collect());

/// Annotation for a (scope, field) pair, if one is curated
pub fn lookup(scope: Scope, field: &str) -> Option<&'static Annotation> {
    // HashMap is covariant in its key, so the 'static map can be probed with a borrowed key
    let by_key: &HashMap<FieldKey<'_>, &'static Annotation> = &*BY_KEY;
    by_key.get(&FieldKey::new(scope, field)).copied()
}
