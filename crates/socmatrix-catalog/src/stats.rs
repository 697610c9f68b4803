//! Fetch statistics and the end-of-run summary.
//!
//! TTY runs print comfy tables; non-TTY runs emit one log line per item.

use std::path::PathBuf;
use std::time::Duration;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use socmatrix_core::{ProgressContext, fmt_num};

use crate::api::Endpoint;
use crate::fields::Scope;
use crate::plan::ComboCount;

/// One completed request
#[derive(Debug, Clone)]
pub struct FetchStats {
    pub endpoint: Endpoint,
    pub term: String,
    pub campus: String,
    /// Top-level array length (courses or indexes)
    pub records: usize,
    pub bytes: usize,
    pub elapsed: Duration,
}

impl FetchStats {
    pub fn line(&self) -> String {
        match self.endpoint {
            Endpoint::Courses => format!(
                "[courses] {} {}: {} rows • {} bytes • {} ms",
                self.term,
                self.campus,
                self.records,
                fmt_num(self.bytes),
                self.elapsed.as_millis()
            ),
            Endpoint::OpenSections => format!(
                "[openSections] {} {}: {} indexes • {} bytes",
                self.term,
                self.campus,
                self.records,
                fmt_num(self.bytes)
            ),
        }
    }

    pub fn log(&self) {
        log::info!("{}", self.line());
    }
}

/// Snapshot line for one combination
pub fn combo_line(count: &ComboCount<'_>) -> String {
    let c = &count.combination;
    format!(
        "- {} {} subj={} lvl={} → {} courses / {} sections",
        c.term.code, c.campus.code, c.subject.code, c.level, count.courses, count.sections
    )
}

/// What a completed run produced
#[derive(Debug)]
pub struct RunSummary<'a> {
    pub output: PathBuf,
    pub rows_written: usize,
    pub fetches: Vec<FetchStats>,
    pub combos: Vec<ComboCount<'a>>,
    /// Records observed per scope, in report order
    pub scope_totals: Vec<(Scope, usize)>,
}

impl RunSummary<'_> {
    pub fn total_bytes(&self) -> usize {
        self.fetches.iter().map(|f| f.bytes).sum()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.fetches.iter().map(|f| f.elapsed).sum()
    }

    /// Format the per-combination snapshot as a table.
    pub fn format_snapshot(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Subject coverage")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Campus").fg(Color::Cyan),
                Cell::new("Subject").fg(Color::Cyan),
                Cell::new("Level").fg(Color::Cyan),
                Cell::new("Courses").fg(Color::Cyan),
                Cell::new("Sections").fg(Color::Cyan),
            ]);

        for count in &self.combos {
            let c = &count.combination;
            let color = if count.courses > 0 {
                Color::Green
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new(c.term.label),
                Cell::new(c.campus.code),
                Cell::new(format!("{} {}", c.subject.code, c.subject.label)),
                Cell::new(c.level),
                Cell::new(fmt_num(count.courses)).fg(color),
                Cell::new(fmt_num(count.sections)).fg(color),
            ]);
        }

        format!("\n{table}")
    }

    /// Format per-scope record totals as a table.
    pub fn format_scopes(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new(format!("Field matrix ({} rows)", fmt_num(self.rows_written)))
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Records").fg(Color::Cyan),
            ]);
        for (scope, total) in &self.scope_totals {
            table.add_row(vec![Cell::new(scope.as_str()), Cell::new(fmt_num(*total))]);
        }
        table.add_row(vec![
            Cell::new("Downloaded"),
            Cell::new(format!(
                "{} bytes in {:.1}s",
                fmt_num(self.total_bytes()),
                self.total_elapsed().as_secs_f64()
            )),
        ]);
        format!("\n{table}")
    }

    /// Print tables above the spinners (TTY mode).
    pub fn print(&self, progress: &ProgressContext) {
        progress.println(self.format_scopes());
        progress.println(self.format_snapshot());
    }

    /// Log the snapshot one combination per line (non-TTY mode).
    pub fn log(&self) {
        let scopes: Vec<String> = self
            .scope_totals
            .iter()
            .map(|(scope, total)| format!("{scope}={}", fmt_num(*total)))
            .collect();
        log::info!("Records: {}", scopes.join(" "));
        log::info!("Subject coverage snapshot (courses • sections):");
        for count in &self.combos {
            log::info!("{}", combo_line(count));
        }
    }
}
