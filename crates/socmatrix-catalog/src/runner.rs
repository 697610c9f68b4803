//! Main execution logic for a field-matrix run

use anyhow::Context;
use serde_json::Value;
use socmatrix_core::ProgressContext;

use crate::api::{CatalogRequest, CatalogSource, Endpoint};
use crate::catalog::{CampusConfig, Catalog, TermConfig};
use crate::config::Config;
use crate::plan::{DatasetCache, DatasetKey, plan, tally};
use crate::report::{build_rows, write_csv};
use crate::stats::{FetchStats, RunSummary};
use crate::survey::Survey;

/// Fetch one endpoint for a (term, campus) pair and unwrap the top-level array.
fn fetch_array<S: CatalogSource>(
    source: &S,
    endpoint: Endpoint,
    term: &TermConfig,
    campus: &CampusConfig,
) -> anyhow::Result<(Vec<Value>, FetchStats)> {
    let request = CatalogRequest {
        endpoint,
        year: term.year,
        term: term.term,
        campus: campus.code,
        level: None,
    };
    let (payload, meta) = source
        .fetch(&request)
        .with_context(|| format!("{endpoint} {} {} failed", term.code, campus.code))?;

    let Value::Array(records) = payload else {
        anyhow::bail!("{endpoint} payload from {} is not a JSON array", meta.url);
    };
    let stats = FetchStats {
        endpoint,
        term: term.code.to_string(),
        campus: campus.code.to_string(),
        records: records.len(),
        bytes: meta.bytes,
        elapsed: meta.elapsed,
    };
    Ok((records, stats))
}

/// Run the whole pipeline: fetch every (term, campus) pair, accumulate
/// field presence, count subject combinations, write the CSV.
///
/// Requests are sequential and the first failure aborts the run.
pub fn run<'a, S: CatalogSource>(
    source: &S,
    catalog: &Catalog<'a>,
    config: &Config,
    progress: &ProgressContext,
) -> anyhow::Result<RunSummary<'a>> {
    let combos = plan(catalog.terms, catalog.campuses, catalog.subjects);
    log::info!(
        "Planned combinations: {} (terms={}, campus={}, subjects={})",
        combos.len(),
        catalog.terms.len(),
        catalog.campuses.len(),
        catalog.subjects.len()
    );

    let mut survey = Survey::new();
    let mut cache = DatasetCache::new();
    let mut fetches = Vec::new();

    for term in catalog.terms {
        for campus in catalog.campuses {
            let pb = progress.stage_line(term.code);

            pb.set_message(format!("{} courses", campus.code));
            let (courses, stats) = fetch_array(source, Endpoint::Courses, term, campus)?;
            stats.log();
            fetches.push(stats);

            pb.set_message(format!("{} openSections", campus.code));
            let (indexes, stats) = fetch_array(source, Endpoint::OpenSections, term, campus)?;
            stats.log();
            fetches.push(stats);
            pb.finish_and_clear();

            survey.observe_courses(&courses);
            survey.observe_open_sections(&indexes);
            cache.insert(DatasetKey::new(term, campus), courses);
        }
    }
    if survey.skipped() > 0 {
        log::warn!("{} course entries were not JSON objects", survey.skipped());
    }

    // Subject-level counts reuse the cached payloads
    let counts = tally(&combos, &cache)?;

    let rows = build_rows(&survey);
    write_csv(&rows, &config.output)?;
    log::info!(
        "Field matrix written to {} ({} rows)",
        config.output.display(),
        rows.len()
    );

    let scope_totals = survey
        .scopes()
        .into_iter()
        .map(|s| (s.scope(), s.total()))
        .collect();
    let summary = RunSummary {
        output: config.output.clone(),
        rows_written: rows.len(),
        fetches,
        combos: counts,
        scope_totals,
    };
    if progress.is_tty() {
        summary.print(progress);
    } else {
        summary.log();
    }
    Ok(summary)
}
