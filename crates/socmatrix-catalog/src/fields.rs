//! Field-presence accumulation over nested JSON records.
//!
//! Each [`FieldStats`] covers one record [`Scope`]. Nested objects are
//! flattened into dotted paths (`school.code`); only scalar and list leaves
//! are counted. Lists of objects that form their own scope (a section's
//! `meetingTimes`) are excluded through the parent's skip set and observed
//! by a separate accumulator.

use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

/// Maximum sample values kept per field
pub const MAX_SAMPLES: usize = 3;

/// Sample snippets longer than this (in characters) are cut and suffixed with `…`
pub const SAMPLE_CHAR_LIMIT: usize = 120;

/// Logical record type a field belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Course,
    CourseCampusLocation,
    Section,
    SectionCampusLocation,
    SectionMeeting,
    SectionInstructor,
    /// The index-only `openSections` feed
    OpenSections,
}

impl Scope {
    /// Name as written in the report's `scope` column
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::CourseCampusLocation => "course.campusLocation",
            Self::Section => "section",
            Self::SectionCampusLocation => "section.campusLocation",
            Self::SectionMeeting => "section.meeting",
            Self::SectionInstructor => "section.instructor",
            Self::OpenSections => "openSections",
        }
    }

    /// Top-level keys handled as their own scope and skipped by this one
    pub fn skip_keys(self) -> &'static [&'static str] {
        match self {
            Self::Course => &["sections", "campusLocations"],
            Self::Section => &["meetingTimes", "instructors", "sectionCampusLocations"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report row; annotation columns start empty and are filled by the report writer
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub scope: Scope,
    pub field: String,
    pub non_null: usize,
    pub total: usize,
    pub presence: f64,
    pub fr_mapping: String,
    pub fr_status: String,
    pub sample_values: String,
    pub notes: String,
}

impl FieldRow {
    pub fn new(scope: Scope, field: impl Into<String>, non_null: usize, total: usize) -> Self {
        Self {
            scope,
            field: field.into(),
            non_null,
            total,
            presence: presence(non_null, total),
            fr_mapping: String::new(),
            fr_status: String::new(),
            sample_values: String::new(),
            notes: String::new(),
        }
    }

    /// `presence_pct` column: 4-decimal fraction
    pub fn presence_pct(&self) -> String {
        format!("{:.4}", self.presence)
    }
}

/// `non_null / total`, or 0 for an empty scope
pub fn presence(non_null: usize, total: usize) -> f64 {
    if total > 0 {
        non_null as f64 / total as f64
    } else {
        0.0
    }
}

/// Cut to [`SAMPLE_CHAR_LIMIT`] characters, marking the cut with a single `…`
pub fn truncate_sample(value: &str) -> String {
    match value.char_indices().nth(SAMPLE_CHAR_LIMIT) {
        Some((cut, _)) => format!("{}…", &value[..cut]),
        None => value.to_string(),
    }
}

#[derive(Debug, Default, Clone)]
struct FieldTally {
    non_null: usize,
    samples: Vec<String>,
}

/// Presence counts and sample values for one scope
#[derive(Debug, Clone)]
pub struct FieldStats {
    scope: Scope,
    total: usize,
    fields: BTreeMap<String, FieldTally>,
}

impl FieldStats {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            total: 0,
            fields: BTreeMap::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Records observed so far
    pub fn total(&self) -> usize {
        self.total
    }

    /// Records in which `field` was non-empty
    pub fn non_null(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, |t| t.non_null)
    }

    pub fn samples(&self, field: &str) -> &[String] {
        self.fields
            .get(field)
            .map(|t| t.samples.as_slice())
            .unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Count one record; every key outside the scope's skip set is flattened.
    pub fn observe(&mut self, record: &Map<String, Value>) {
        self.total += 1;
        let skip = self.scope.skip_keys();
        for (key, value) in record {
            if skip.contains(&key.as_str()) {
                continue;
            }
            self.ingest(key, value);
        }
    }

    fn ingest(&mut self, path: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (sub_key, sub_value) in map {
                    self.ingest(&format!("{path}.{sub_key}"), sub_value);
                }
            }
            Value::Array(items) => {
                let Some(first) = items.first() else {
                    return;
                };
                // Scalar lists are sampled whole, object lists by first element
                let snippet = if is_scalar(first) {
                    json_snippet(items)
                } else {
                    json_snippet(&items[..1])
                };
                self.record(path, || snippet);
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return;
                }
                self.record(path, || trimmed.to_string());
            }
            Value::Bool(b) => self.record(path, || bool_text(*b).to_string()),
            Value::Number(n) => self.record(path, || n.to_string()),
        }
    }

    fn record(&mut self, path: &str, display: impl FnOnce() -> String) {
        let tally = self.fields.entry(path.to_string()).or_default();
        tally.non_null += 1;
        if tally.samples.len() < MAX_SAMPLES {
            tally.samples.push(truncate_sample(&display()));
        }
    }

    /// One row per observed field, sorted by path
    pub fn to_rows(&self) -> Vec<FieldRow> {
        self.fields
            .iter()
            .map(|(field, tally)| {
                let mut row = FieldRow::new(self.scope, field.as_str(), tally.non_null, self.total);
                row.sample_values = tally.samples.join(" | ");
                row
            })
            .collect()
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Boolean samples are written capitalized
fn bool_text(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Single-line JSON with `", "` between items and `": "` after keys
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serialize a list slice; object keys keep their payload order
fn json_snippet(items: &[Value]) -> String {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    if items.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn whitespace_string_is_absent() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({"title": "   \t", "subject": "198"})));
        assert_eq!(stats.total(), 1);
        assert!(!stats.contains("title"));
        assert_eq!(stats.non_null("subject"), 1);
    }

    #[test]
    fn strings_are_trimmed_before_sampling() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({"title": "  INTRO COMPUTER SCI  "})));
        assert_eq!(stats.samples("title"), ["INTRO COMPUTER SCI"]);
    }

    #[test]
    fn nested_objects_flatten_to_leaf_paths() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({"a": {"b": {"c": 1}}})));
        let rows = stats.to_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field, "a.b.c");
        assert_eq!(rows[0].sample_values, "1");
        assert!(!stats.contains("a"));
        assert!(!stats.contains("a.b"));
    }

    #[test]
    fn null_and_empty_list_ignored() {
        let mut stats = FieldStats::new(Scope::Section);
        stats.observe(&obj(json!({"comments": [], "examCode": null})));
        assert_eq!(stats.total(), 1);
        assert!(stats.to_rows().is_empty());
    }

    #[test]
    fn list_counted_once_regardless_of_length() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({"coreCodes": [{"code": "QQ"}, {"code": "QR"}, {"code": "WCd"}]})));
        stats.observe(&obj(json!({"coreCodes": [{"code": "AHp"}]})));
        assert_eq!(stats.non_null("coreCodes"), 2);
        assert_eq!(stats.samples("coreCodes")[0], r#"[{"code": "QQ"}]"#);
    }

    #[test]
    fn scalar_list_sampled_whole() {
        let mut stats = FieldStats::new(Scope::Section);
        stats.observe(&obj(json!({"majors": ["198", "640"]})));
        assert_eq!(stats.samples("majors"), [r#"["198", "640"]"#]);
    }

    #[test]
    fn object_samples_keep_payload_key_order() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({
            "coreCodes": [{"id": "x", "code": "QQ", "description": "Quantitative"}]
        })));
        assert_eq!(
            stats.samples("coreCodes"),
            [r#"[{"id": "x", "code": "QQ", "description": "Quantitative"}]"#]
        );
    }

    #[test]
    fn nested_list_samples_are_spaced() {
        let mut stats = FieldStats::new(Scope::Section);
        stats.observe(&obj(json!({"crossListedSections": [{"subject": "640", "codes": [1, 2]}]})));
        assert_eq!(
            stats.samples("crossListedSections"),
            [r#"[{"subject": "640", "codes": [1, 2]}]"#]
        );
    }

    #[test]
    fn numbers_and_bools_sampled_as_text() {
        let mut stats = FieldStats::new(Scope::Section);
        stats.observe(&obj(json!({"openStatus": true, "credits": 4, "hours": 1.5})));
        stats.observe(&obj(json!({"openStatus": false})));
        assert_eq!(stats.samples("openStatus"), ["True", "False"]);
        assert_eq!(stats.samples("credits"), ["4"]);
        assert_eq!(stats.samples("hours"), ["1.5"]);
    }

    #[test]
    fn samples_capped_in_first_seen_order() {
        let mut stats = FieldStats::new(Scope::SectionMeeting);
        for day in ["M", "T", "W", "H", "F"] {
            stats.observe(&obj(json!({ "meetingDay": day })));
        }
        assert_eq!(stats.non_null("meetingDay"), 5);
        assert_eq!(stats.samples("meetingDay"), ["M", "T", "W"]);
        assert_eq!(stats.to_rows()[0].sample_values, "M | T | W");
    }

    #[test]
    fn skip_keys_are_not_flattened() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({
            "subject": "198",
            "sections": [{"index": "1"}],
            "campusLocations": [{"code": "1"}]
        })));
        assert!(!stats.contains("sections"));
        assert!(!stats.contains("campusLocations"));

        let mut section = FieldStats::new(Scope::Section);
        section.observe(&obj(json!({"meetingTimes": [{}], "instructors": [{}], "number": "01"})));
        assert_eq!(section.to_rows().len(), 1);
    }

    #[test]
    fn counts_never_exceed_total() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({"subject": "198"})));
        stats.observe(&obj(json!({})));
        stats.observe(&obj(json!({"subject": " "})));
        let rows = stats.to_rows();
        assert_eq!(rows[0].non_null, 1);
        assert_eq!(rows[0].total, 3);
        assert_eq!(rows[0].presence_pct(), "0.3333");
    }

    #[test]
    fn rows_sorted_by_path() {
        let mut stats = FieldStats::new(Scope::Course);
        stats.observe(&obj(json!({"title": "X", "school": {"code": "01"}, "credits": 3})));
        let fields: Vec<_> = stats.to_rows().into_iter().map(|r| r.field).collect();
        assert_eq!(fields, ["credits", "school.code", "title"]);
    }

    #[test]
    fn truncates_long_samples() {
        let long = "x".repeat(130);
        let cut = truncate_sample(&long);
        assert_eq!(cut.chars().count(), 121);
        assert!(cut.ends_with('…'));
        assert_eq!(&cut[..120], &long[..120]);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let exact = "é".repeat(120);
        assert_eq!(truncate_sample(&exact), exact);
        let over = "é".repeat(121);
        assert_eq!(truncate_sample(&over).chars().count(), 121);
    }

    #[test]
    fn presence_of_empty_scope_is_zero() {
        assert_eq!(presence(0, 0), 0.0);
        assert_eq!(FieldRow::new(Scope::Section, "x", 0, 0).presence_pct(), "0.0000");
        assert_eq!(FieldRow::new(Scope::Course, "x", 1, 1).presence_pct(), "1.0000");
    }
}
