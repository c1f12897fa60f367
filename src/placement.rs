//! Label placement: inside vs. outside labels, outside tiers, leader lines.
//!
//! Decisions use the true share (`raw_pct`), not the floored display width.
//! Outside labels alternate above/below in bar order; the k-th outside label
//! (1-based) goes above when k is odd and sits in row `(k - 1) / 2`. Rows past
//! the first get a vertical leader line back to the segment's centre.

use crate::config::LayoutConfig;
use crate::models::{LabelMode, LabelPlacement, LeaderLine, Segment};
use log::debug;

/// What text a segment shows, and where, before tiers are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LabelPolicy {
    /// Name and percentage inside the bar.
    Inside,
    /// Name outside, percentage still inside.
    OutsideName,
    /// Name and percentage outside; the segment is too narrow for text.
    OutsideFull,
}

/// Classify a share. Monotonic: a smaller `raw_pct` never yields an earlier variant.
///
/// Thresholds compare the unrounded share, so 29.96% sits below a 30%
/// threshold even though its label prints as "30.0%".
pub fn label_policy(raw_pct: f64, config: &LayoutConfig) -> LabelPolicy {
    if raw_pct >= config.outside_label_threshold_pct {
        LabelPolicy::Inside
    } else if raw_pct >= config.outside_label_inner_pct_threshold {
        LabelPolicy::OutsideName
    } else {
        LabelPolicy::OutsideFull
    }
}

/// Side and tier of the k-th outside label (k starts at 1).
pub fn outside_slot(k: usize) -> (LabelMode, u32) {
    debug_assert!(k >= 1, "outside labels are numbered from 1");
    let mode = if k % 2 == 1 {
        LabelMode::OutsideAbove
    } else {
        LabelMode::OutsideBelow
    };
    (mode, (k.saturating_sub(1) / 2) as u32)
}

/// Percentage as printed in labels: one decimal place.
pub fn format_pct(raw_pct: f64) -> String {
    format!("{raw_pct:.1}%")
}

/// One placement per segment, in bar order.
pub fn place(segments: &[Segment], config: &LayoutConfig) -> Vec<LabelPlacement> {
    let mut placements = Vec::with_capacity(segments.len());
    let mut left = 0.0;
    let mut outside_seen = 0usize;

    for (segment_index, seg) in segments.iter().enumerate() {
        let center_x = left + seg.display_pct / 2.0;
        left += seg.display_pct;

        if seg.is_empty() {
            placements.push(LabelPlacement {
                segment_index,
                mode: LabelMode::Hidden,
                tier: 0,
                inside_text: String::new(),
                outside_text: String::new(),
                leader_line: None,
            });
            continue;
        }

        let pct = format_pct(seg.raw_pct);
        let full = format!("{} {}", seg.label, pct);
        let (inside_text, outside_text) = match label_policy(seg.raw_pct, config) {
            LabelPolicy::Inside => {
                placements.push(LabelPlacement {
                    segment_index,
                    mode: LabelMode::Inside,
                    tier: 0,
                    inside_text: full,
                    outside_text: String::new(),
                    leader_line: None,
                });
                continue;
            }
            LabelPolicy::OutsideName => (pct, seg.label.clone()),
            LabelPolicy::OutsideFull => (String::new(), full),
        };

        outside_seen += 1;
        let (mode, tier) = outside_slot(outside_seen);
        let leader_line = (tier > 0).then(|| leader_for(center_x, mode, tier, config));
        placements.push(LabelPlacement {
            segment_index,
            mode,
            tier,
            inside_text,
            outside_text,
            leader_line,
        });
    }

    debug!(
        "placed {} labels, {} outside",
        placements.len(),
        outside_seen
    );
    placements
}

fn leader_for(center_x: f64, mode: LabelMode, tier: u32, config: &LayoutConfig) -> LeaderLine {
    let offset = tier as f64 * config.label_row_height_px;
    let (anchor_y, label_y) = match mode {
        LabelMode::OutsideBelow => (config.bar_height_px, config.bar_height_px + offset),
        _ => (0.0, -offset),
    };
    LeaderLine {
        anchor_x: center_x,
        anchor_y,
        label_x: center_x,
        label_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_alternate_and_climb() {
        let slots: Vec<_> = (1..=6).map(outside_slot).collect();
        assert_eq!(
            slots,
            vec![
                (LabelMode::OutsideAbove, 0),
                (LabelMode::OutsideBelow, 0),
                (LabelMode::OutsideAbove, 1),
                (LabelMode::OutsideBelow, 1),
                (LabelMode::OutsideAbove, 2),
                (LabelMode::OutsideBelow, 2),
            ]
        );
    }

    #[test]
    fn pct_text_keeps_one_decimal() {
        assert_eq!(format_pct(97.0), "97.0%");
        assert_eq!(format_pct(2.54), "2.5%");
    }
}
