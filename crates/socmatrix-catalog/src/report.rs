//! Field-matrix assembly and CSV output.
//!
//! Rows come from three places: the per-scope accumulators, manual
//! presence counts for list fields the accumulators skip, and fixed rows
//! documenting what the `openSections` feed does not carry. Every row is
//! joined against the curated annotation table.

use std::path::Path;

use anyhow::Context;

use crate::annotations;
use crate::fields::{FieldRow, Scope};
use crate::survey::Survey;

/// CSV header, in column order
pub const HEADER: [&str; 9] = [
    "scope",
    "field",
    "non_null",
    "total",
    "presence_pct",
    "fr_mapping",
    "fr_status",
    "sample_values",
    "notes",
];

/// Fields the openSections feed is known not to return
const OPEN_SECTIONS_MISSING: [&str; 2] = ["capacity", "notes"];

/// Fill the annotation columns from the curated table; unmapped fields stay empty.
pub fn annotate(row: &mut FieldRow) {
    if let Some(a) = annotations::lookup(row.scope, &row.field) {
        row.fr_mapping = a.fr_mapping.to_string();
        row.fr_status = a.status.as_str().to_string();
        row.notes = a.notes.to_string();
    }
}

fn annotated(mut row: FieldRow) -> FieldRow {
    annotate(&mut row);
    row
}

/// Manual presence rows, as (scope, field, non_null).
///
/// `campusLocations` and `meetingTimes` are skipped by their parent scope
/// and counted by truthiness instead; `offeringUnitTitle` is always null
/// in practice and is reported as zero when never observed.
fn manual_counts(survey: &Survey) -> [(Scope, &'static str, usize); 3] {
    [
        (Scope::Course, "campusLocations", survey.courses_with_locations),
        (Scope::Section, "meetingTimes", survey.sections_with_meetings),
        (Scope::Course, "offeringUnitTitle", 0),
    ]
}

fn open_sections_rows(survey: &Survey) -> Vec<FieldRow> {
    let total = survey.open_section_total();
    let mut rows = Vec::with_capacity(3);
    if total > 0 {
        let mut index = FieldRow::new(Scope::OpenSections, "index", total, total);
        index.sample_values = survey.open_section_samples().join(" | ");
        rows.push(annotated(index));
    }
    for field in OPEN_SECTIONS_MISSING {
        rows.push(annotated(FieldRow::new(Scope::OpenSections, field, 0, total)));
    }
    rows
}

/// Build the complete, annotated row set sorted by (scope, field)
pub fn build_rows(survey: &Survey) -> Vec<FieldRow> {
    let mut rows: Vec<FieldRow> = survey
        .scopes()
        .into_iter()
        .flat_map(|stats| stats.to_rows())
        .map(annotated)
        .collect();

    for (scope, field, non_null) in manual_counts(survey) {
        if rows.iter().any(|r| r.scope == scope && r.field == field) {
            continue;
        }
        let total = survey.scope_total(scope);
        rows.push(annotated(FieldRow::new(scope, field, non_null, total)));
    }

    rows.extend(open_sections_rows(survey));
    sort_rows(&mut rows);
    rows
}

/// Lexicographic on the scope name, then field path
pub fn sort_rows(rows: &mut [FieldRow]) {
    rows.sort_by(|a, b| {
        (a.scope.as_str(), a.field.as_str()).cmp(&(b.scope.as_str(), b.field.as_str()))
    });
}

/// Write rows to `path`, creating parent directories and replacing any existing file.
pub fn write_csv(rows: &[FieldRow], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;

    writer.write_record(HEADER)?;
    for row in rows {
        let non_null = row.non_null.to_string();
        let total = row.total.to_string();
        let presence_pct = row.presence_pct();
        writer.write_record([
            row.scope.as_str(),
            row.field.as_str(),
            non_null.as_str(),
            total.as_str(),
            presence_pct.as_str(),
            row.fr_mapping.as_str(),
            row.fr_status.as_str(),
            row.sample_values.as_str(),
            row.notes.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("Cannot write {}", path.display()))?;
    log::debug!("{} rows -> {}", rows.len(), path.display());
    Ok(())
}
