//! File I/O around the engine: aggregated counts in, layout descriptors out.

use crate::models::{GroupSeries, LabelMode, ReportLayout};
use ahash::AHashMap;
use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::warn;
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CountRow {
    #[serde(default)]
    group: String,
    label: String,
    count: i64,
}

/// Load counts, choosing the reader by file extension (`.csv` or `.json`).
pub fn load_counts<P: AsRef<Path>>(path: P) -> Result<Vec<GroupSeries>> {
    let path = path.as_ref();
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => load_counts_csv(path),
        Some("json") => load_counts_json(path),
        other => bail!(
            "unsupported counts file extension {:?} (expected .csv or .json)",
            other.unwrap_or("")
        ),
    }
}

/// Read `group,label,count` rows (the `group` column is optional).
///
/// Groups and labels keep their first-appearance order. Repeated
/// `(group, label)` rows are summed.
pub fn load_counts_csv<P: AsRef<Path>>(path: P) -> Result<Vec<GroupSeries>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut groups: Vec<GroupSeries> = Vec::new();
    let mut group_index: AHashMap<String, usize> = AHashMap::new();
    for (line, row) in rdr.deserialize::<CountRow>().enumerate() {
        let row = row.with_context(|| format!("{}: bad row {}", path.display(), line + 2))?;
        let gi = *group_index.entry(row.group.clone()).or_insert_with(|| {
            groups.push(GroupSeries::new(row.group.clone(), Vec::new()));
            groups.len() - 1
        });
        let counts = &mut groups[gi].counts;
        match counts.iter_mut().find(|(l, _)| *l == row.label) {
            Some((_, c)) => {
                warn!(
                    "duplicate row for {:?}/{:?} in {}; summing",
                    row.group,
                    row.label,
                    path.display()
                );
                *c = c
                    .checked_add(row.count)
                    .with_context(|| format!("count overflow for {:?}", row.label))?;
            }
            None => counts.push((row.label, row.count)),
        }
    }
    Ok(groups)
}

/// Read `[{"name": ..., "counts": [["label", n], ...]}, ...]`.
pub fn load_counts_json<P: AsRef<Path>>(path: P) -> Result<Vec<GroupSeries>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let groups: Vec<GroupSeries> = serde_json::from_reader(file)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(groups)
}

/// Save the report layout as pretty JSON.
pub fn save_layout_json<P: AsRef<Path>>(report: &ReportLayout, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(report)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save one row per segment. Text cells that a spreadsheet would evaluate as
/// a formula are prefixed with `'`.
pub fn save_layout_csv<P: AsRef<Path>>(report: &ReportLayout, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "bar", "label", "count", "raw_pct", "display_pct", "offset_pct", "color", "mode", "tier",
        "inside_text", "outside_text",
    ))?;
    for bar in &report.bars {
        let title = bar.title.as_deref().unwrap_or("");
        for s in &bar.segments {
            wtr.serialize((
                sanitize_cell(title),
                sanitize_cell(&s.label),
                s.raw_count,
                s.raw_pct,
                s.display_pct,
                s.offset_pct,
                &s.color,
                mode_name(s.mode),
                s.tier,
                sanitize_cell(&s.inside_text),
                sanitize_cell(&s.outside_text),
            ))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn mode_name(mode: LabelMode) -> &'static str {
    match mode {
        LabelMode::Inside => "inside",
        LabelMode::OutsideAbove => "outside_above",
        LabelMode::OutsideBelow => "outside_below",
        LabelMode::Hidden => "hidden",
    }
}

fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_without_group_column_is_one_series() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("c.csv");
        fs::write(&p, "label,count\nYes, 970\nNo,20\nUnsure,10\n").unwrap();
        let groups = load_counts_csv(&p).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "");
        assert_eq!(
            groups[0].counts,
            vec![
                ("Yes".to_string(), 970),
                ("No".to_string(), 20),
                ("Unsure".to_string(), 10)
            ]
        );
    }

    #[test]
    fn duplicate_rows_are_summed() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("c.csv");
        fs::write(&p, "group,label,count\nA,Yes,1\nB,Yes,4\nA,Yes,2\n").unwrap();
        let groups = load_counts_csv(&p).unwrap();
        assert_eq!(groups[0].name, "A");
        assert_eq!(groups[0].counts, vec![("Yes".to_string(), 3)]);
        assert_eq!(groups[1].counts, vec![("Yes".to_string(), 4)]);
    }

    #[test]
    fn formula_cells_get_a_quote() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("Yes"), "Yes");
    }
}
