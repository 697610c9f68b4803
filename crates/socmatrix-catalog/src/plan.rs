//! Term × campus × subject × level combinations and their subject-level counts.
//!
//! Counts are derived from the per-(term, campus) course payloads already
//! fetched for field accumulation; planning never touches the network.

use std::collections::HashMap;

use anyhow::Context;
use serde_json::Value;

use crate::catalog::{CampusConfig, SubjectConfig, TermConfig};

/// Cache key for a fetched course payload: (term code, campus code)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub term: String,
    pub campus: String,
}

impl DatasetKey {
    pub fn new(term: &TermConfig, campus: &CampusConfig) -> Self {
        Self {
            term: term.code.to_string(),
            campus: campus.code.to_string(),
        }
    }
}

/// Course payloads by (term, campus), filled by the fetch loop
pub type DatasetCache = HashMap<DatasetKey, Vec<Value>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Combination<'a> {
    pub term: &'a TermConfig,
    pub campus: &'a CampusConfig,
    pub subject: &'a SubjectConfig,
    pub level: &'a str,
}

impl Combination<'_> {
    pub fn dataset_key(&self) -> DatasetKey {
        DatasetKey::new(self.term, self.campus)
    }
}

/// Course and section totals for one combination
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComboCount<'a> {
    pub combination: Combination<'a>,
    pub courses: usize,
    pub sections: usize,
}

/// Full cross-product in declaration order; each subject expands once per level.
pub fn plan<'a>(
    terms: &'a [TermConfig],
    campuses: &'a [CampusConfig],
    subjects: &'a [SubjectConfig],
) -> Vec<Combination<'a>> {
    let mut combos = Vec::new();
    for term in terms {
        for campus in campuses {
            for subject in subjects {
                for &level in subject.levels {
                    combos.push(Combination {
                        term,
                        campus,
                        subject,
                        level,
                    });
                }
            }
        }
    }
    combos
}

/// Courses whose `subject` equals `code` exactly, and the sum of their section counts
pub fn count_subject(courses: &[Value], code: &str) -> (usize, usize) {
    courses
        .iter()
        .filter(|c| c.get("subject").and_then(Value::as_str) == Some(code))
        .fold((0, 0), |(n_courses, n_sections), course| {
            let sections = course
                .get("sections")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            (n_courses + 1, n_sections + sections)
        })
}

/// Count every combination against the cached payloads.
///
/// Fails if a combination's (term, campus) payload was never fetched.
pub fn tally<'a>(
    combos: &[Combination<'a>],
    cache: &DatasetCache,
) -> anyhow::Result<Vec<ComboCount<'a>>> {
    combos
        .iter()
        .map(|combo| {
            let key = combo.dataset_key();
            let courses = cache
                .get(&key)
                .with_context(|| format!("No cached courses for {} {}", key.term, key.campus))?;
            let (n_courses, n_sections) = count_subject(courses, combo.subject.code);
            Ok(ComboCount {
                combination: *combo,
                courses: n_courses,
                sections: n_sections,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CAMPUSES, SUBJECTS, TERMS};
    use serde_json::json;

    fn payload() -> Vec<Value> {
        match json!([
            {"subject": "198", "sections": [{}, {}]},
            {"subject": "640", "sections": [{}]}
        ]) {
            Value::Array(v) => v,
            _ => unreachable!(),
        }
    }

    #[test]
    fn plan_size_matches_levels() {
        let combos = plan(TERMS, CAMPUSES, SUBJECTS);
        let levels: usize = SUBJECTS.iter().map(|s| s.levels.len()).sum();
        assert_eq!(combos.len(), TERMS.len() * CAMPUSES.len() * levels);
        assert_eq!(combos.len(), 42);
    }

    #[test]
    fn plan_preserves_declaration_order() {
        let combos = plan(TERMS, CAMPUSES, SUBJECTS);
        let first = combos[0];
        assert_eq!(
            (first.term.code, first.campus.code, first.subject.code, first.level),
            ("12024", "NB", "198", "U")
        );
        // 640 expands to U then G before 750
        let tail: Vec<_> = combos[1..4]
            .iter()
            .map(|c| (c.subject.code, c.level))
            .collect();
        assert_eq!(tail, [("640", "U"), ("640", "G"), ("750", "G")]);
        let last = combos.last().unwrap();
        assert_eq!(
            (last.term.code, last.campus.code, last.subject.code),
            ("92024", "CM", "014")
        );
    }

    #[test]
    fn counts_by_subject() {
        let courses = payload();
        assert_eq!(count_subject(&courses, "198"), (1, 2));
        assert_eq!(count_subject(&courses, "640"), (1, 1));
        assert_eq!(count_subject(&courses, "014"), (0, 0));
    }

    #[test]
    fn missing_sections_count_as_zero() {
        let courses = vec![
            json!({"subject": "960"}),
            json!({"subject": "960", "sections": null}),
        ];
        assert_eq!(count_subject(&courses, "960"), (2, 0));
    }

    #[test]
    fn tally_uses_cache() {
        let term = &TERMS[0];
        let campus = &CAMPUSES[0];
        let mut cache = DatasetCache::new();
        cache.insert(DatasetKey::new(term, campus), payload());

        let combos = plan(&TERMS[..1], &CAMPUSES[..1], SUBJECTS);
        let counts = tally(&combos, &cache).unwrap();
        assert_eq!(counts.len(), combos.len());
        assert_eq!((counts[0].courses, counts[0].sections), (1, 2));
        let absent = counts
            .iter()
            .find(|c| c.combination.subject.code == "014")
            .unwrap();
        assert_eq!((absent.courses, absent.sections), (0, 0));
    }

    #[test]
    fn tally_fails_without_payload() {
        let combos = plan(TERMS, CAMPUSES, SUBJECTS);
        let err = tally(&combos, &DatasetCache::new()).unwrap_err();
        assert!(err.to_string().contains("12024 NB"));
    }
}
