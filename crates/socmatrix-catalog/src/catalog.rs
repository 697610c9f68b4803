//! Compiled-in survey enumerations: terms, campuses, subjects

/// A catalog term, e.g. Fall 2024 is code `92024`, year 2024, term 9
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermConfig {
    pub label: &'static str,
    pub code: &'static str,
    pub year: u16,
    pub term: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampusConfig {
    pub code: &'static str,
    pub label: &'static str,
}

/// Subject filter with the degree levels it is surveyed at (`U`, `G`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubjectConfig {
    pub code: &'static str,
    pub label: &'static str,
    pub levels: &'static [&'static str],
}

pub const TERMS: &[TermConfig] = &[
    TermConfig {
        label: "Spring 2024",
        code: "12024",
        year: 2024,
        term: 1,
    },
    TermConfig {
        label: "Fall 2024",
        code: "92024",
        year: 2024,
        term: 9,
    },
];

pub const CAMPUSES: &[CampusConfig] = &[
    CampusConfig {
        code: "NB",
        label: "New Brunswick",
    },
    CampusConfig {
        code: "NK",
        label: "Newark",
    },
    CampusConfig {
        code: "CM",
        label: "Camden",
    },
];

pub const SUBJECTS: &[SubjectConfig] = &[
    SubjectConfig {
        code: "198",
        label: "Computer Science",
        levels: &["U"],
    },
    SubjectConfig {
        code: "640",
        label: "Mathematics",
        levels: &["U", "G"],
    },
    SubjectConfig {
        code: "750",
        label: "Physics",
        levels: &["G"],
    },
    SubjectConfig {
        code: "960",
        label: "Statistics",
        levels: &["U", "G"],
    },
    SubjectConfig {
        code: "014",
        label: "AMESALL / Area Studies",
        levels: &["U"],
    },
];

/// The enumerations a run plans over
#[derive(Clone, Copy, Debug)]
pub struct Catalog<'a> {
    pub terms: &'a [TermConfig],
    pub campuses: &'a [CampusConfig],
    pub subjects: &'a [SubjectConfig],
}

impl Catalog<'static> {
    /// Compiled-in terms, campuses and subjects
    pub const fn builtin() -> Self {
        Self {
            terms: TERMS,
            campuses: CAMPUSES,
            subjects: SUBJECTS,
        }
    }
}
