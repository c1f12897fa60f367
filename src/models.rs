use serde::{Deserialize, Serialize};

/// One option's share of a stacked bar after width normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub raw_count: u64,
    /// True share of the bar's total, in percent.
    pub raw_pct: f64,
    /// Rendered width in percent; floored at the configured minimum.
    pub display_pct: f64,
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        self.raw_count == 0
    }
}

/// Where a segment's label goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    Inside,
    OutsideAbove,
    OutsideBelow,
    /// Zero-count segment: zero width, no label.
    Hidden,
}

impl LabelMode {
    pub fn is_outside(self) -> bool {
        matches!(self, LabelMode::OutsideAbove | LabelMode::OutsideBelow)
    }
}

/// Connector from a segment to a label displaced into tier 1 or higher.
///
/// `*_x` are percentages of the bar width. `*_y` are pixels relative to the
/// bar's top edge, negative above the bar. `label_y` is the label row's edge
/// nearest to the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderLine {
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub segment_index: usize,
    pub mode: LabelMode,
    pub tier: u32,
    pub inside_text: String,
    pub outside_text: String,
    pub leader_line: Option<LeaderLine>,
}

/// One caller-supplied series: a question, or one sub-group of a grouped comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSeries {
    pub name: String,
    pub counts: Vec<(String, i64)>,
}

impl GroupSeries {
    pub fn new(name: impl Into<String>, counts: Vec<(String, i64)>) -> Self {
        Self {
            name: name.into(),
            counts,
        }
    }

    /// Sum of all counts, widened so no series of `i64` counts can overflow it.
    pub fn total(&self) -> i128 {
        self.counts.iter().map(|(_, c)| i128::from(*c)).sum()
    }

    /// Reorder to `order`, filling labels this series lacks with 0.
    /// Labels not named in `order` keep their relative order at the end.
    pub fn aligned_to(&self, order: &[String]) -> GroupSeries {
        let mut counts: Vec<(String, i64)> = order
            .iter()
            .map(|label| {
                let count = self
                    .counts
                    .iter()
                    .find(|(l, _)| l == label)
                    .map(|(_, c)| *c)
                    .unwrap_or(0);
                (label.clone(), count)
            })
            .collect();
        counts.extend(
            self.counts
                .iter()
                .filter(|(l, _)| !order.contains(l))
                .cloned(),
        );
        GroupSeries {
            name: self.name.clone(),
            counts,
        }
    }
}

/// Fully resolved segment, ready for a markup renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLayout {
    pub label: String,
    pub raw_count: u64,
    pub raw_pct: f64,
    pub display_pct: f64,
    /// Left edge of the segment, in percent of the bar width.
    pub offset_pct: f64,
    /// Legend color as `#RRGGBB`.
    pub color: String,
    pub inside_text: String,
    pub outside_text: String,
    pub mode: LabelMode,
    pub tier: u32,
    pub leader_line: Option<LeaderLine>,
}

impl SegmentLayout {
    pub fn center_pct(&self) -> f64 {
        self.offset_pct + self.display_pct / 2.0
    }
}

/// Layout descriptor for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub title: Option<String>,
    pub total_count: u64,
    pub segments: Vec<SegmentLayout>,
}

impl BarLayout {
    /// A bar with no responses; renderers show a placeholder.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn outside_labels(&self) -> impl Iterator<Item = &SegmentLayout> {
        self.segments.iter().filter(|s| s.mode.is_outside())
    }

    /// Number of label rows needed on one side (0 when that side is unused).
    pub fn rows_on(&self, mode: LabelMode) -> u32 {
        self.segments
            .iter()
            .filter(|s| s.mode == mode)
            .map(|s| s.tier + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Everything one report run produced: sibling bars plus the shared legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub bars: Vec<BarLayout>,
    pub legend: Vec<LegendEntry>,
}
