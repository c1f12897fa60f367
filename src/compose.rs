//! Bar composition: normalize, place labels, resolve legend colors.
//!
//! Grouped comparisons are laid out group by group and returned as a flat list
//! of sibling bars; all of them share one legend so an option keeps its color
//! across the whole report.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::legend::{Legend, Rgb8};
use crate::models::{BarLayout, GroupSeries, LabelPlacement, ReportLayout, Segment, SegmentLayout};
use crate::normalize::normalize;
use crate::placement::place;
use std::collections::BTreeMap;

/// Lay out one bar and color it from `legend`.
///
/// `legend` is only touched after the layout succeeded.
pub fn compose_bar<L: AsRef<str>>(
    title: Option<&str>,
    counts: &[(L, i64)],
    config: &LayoutConfig,
    legend: &mut Legend,
) -> Result<BarLayout> {
    let (segments, placements) = layout(counts, config)?;
    assign_colors(&segments, legend);
    Ok(colorize(title, segments, placements, legend))
}

fn layout<L: AsRef<str>>(
    counts: &[(L, i64)],
    config: &LayoutConfig,
) -> Result<(Vec<Segment>, Vec<LabelPlacement>)> {
    let segments = normalize(counts, config)?;
    let placements = place(&segments, config);
    Ok((segments, placements))
}

/// Only options with responses take a legend slot.
fn assign_colors(segments: &[Segment], legend: &mut Legend) {
    for seg in segments.iter().filter(|s| !s.is_empty()) {
        legend.color_for(&seg.label);
    }
}

/// Zero-count segments reuse the label's color when it has one elsewhere in
/// the run and stay colorless otherwise.
fn colorize(
    title: Option<&str>,
    segments: Vec<Segment>,
    placements: Vec<LabelPlacement>,
    legend: &Legend,
) -> BarLayout {
    // normalize already rejected sums that do not fit.
    let total_count = segments
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.raw_count));
    let mut offset = 0.0;
    let segments = segments
        .into_iter()
        .zip(placements)
        .map(|(seg, p)| {
            let offset_pct = offset;
            offset += seg.display_pct;
            SegmentLayout {
                color: legend.get(&seg.label).map(Rgb8::hex).unwrap_or_default(),
                label: seg.label,
                raw_count: seg.raw_count,
                raw_pct: seg.raw_pct,
                display_pct: seg.display_pct,
                offset_pct,
                inside_text: p.inside_text,
                outside_text: p.outside_text,
                mode: p.mode,
                tier: p.tier,
                leader_line: p.leader_line,
            }
        })
        .collect();
    BarLayout {
        title: title.filter(|t| !t.is_empty()).map(str::to_string),
        total_count,
        segments,
    }
}

/// Owns the validated config and the legend for one report run.
#[derive(Debug, Clone)]
pub struct BarComposer {
    config: LayoutConfig,
    legend: Legend,
}

impl BarComposer {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        Self::with_legend(config, Legend::new())
    }

    /// Start from a prepared legend (reserved or pre-seeded colors).
    pub fn with_legend(config: LayoutConfig, legend: Legend) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, legend })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn compose<L: AsRef<str>>(
        &mut self,
        title: Option<&str>,
        counts: &[(L, i64)],
    ) -> Result<BarLayout> {
        compose_bar(title, counts, &self.config, &mut self.legend)
    }

    /// One bar per group, in input order. Every group is laid out before any
    /// color is assigned, so an error leaves the legend as it was.
    pub fn compose_grouped(&mut self, groups: &[GroupSeries]) -> Result<Vec<BarLayout>> {
        let laid_out = groups
            .iter()
            .map(|g| layout(g.counts.as_slice(), &self.config).map(|l| (g.name.as_str(), l)))
            .collect::<Result<Vec<_>>>()?;
        for (_, (segments, _)) in &laid_out {
            assign_colors(segments, &mut self.legend);
        }
        Ok(laid_out
            .into_iter()
            .map(|(name, (segments, placements))| {
                colorize(Some(name), segments, placements, &self.legend)
            })
            .collect())
    }

    /// End the run: bars plus the legend snapshot. The legend is dropped.
    pub fn finish(self, bars: Vec<BarLayout>) -> ReportLayout {
        ReportLayout {
            bars,
            legend: self.legend.entries(),
        }
    }
}

/// Option order by share of the grand total across `groups`, largest first,
/// ties by label; labels listed in `trailing` go last in the given order.
pub fn overall_order(groups: &[GroupSeries], trailing: &[&str]) -> Vec<String> {
    let mut totals: BTreeMap<&str, i128> = BTreeMap::new();
    for g in groups {
        for (label, count) in &g.counts {
            *totals.entry(label.as_str()).or_default() += i128::from((*count).max(0));
        }
    }
    let mut head: Vec<(&str, i128)> = totals
        .iter()
        .map(|(l, c)| (*l, *c))
        .filter(|(l, _)| !trailing.contains(l))
        .collect();
    head.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    head.into_iter()
        .map(|(l, _)| l.to_string())
        .chain(
            trailing
                .iter()
                .filter(|t| totals.contains_key(**t))
                .map(|t| t.to_string()),
        )
        .collect()
}
