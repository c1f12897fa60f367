//! HTML fragments for the survey report pages.
//!
//! Markup only; the page's stylesheet positions `.seg` boxes absolutely inside
//! `.stacked-bar`, stacks `.label-layer-N` rows in `.outside-labels-top` /
//! `.outside-labels-bottom`, and draws `.leader-line` elements as thin
//! vertical borders.

use super::RenderOptions;
use super::text::clamp_label_center;
use crate::models::{BarLayout, LabelMode, LegendEntry, ReportLayout, SegmentLayout};
use std::fmt::Write;

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One stacked bar. A bar without responses renders the placeholder text.
pub fn render_bar(bar: &BarLayout, opts: &RenderOptions) -> String {
    if bar.is_empty() {
        return format!(r#"<div class="muted">{}</div>"#, escape_html(&opts.empty_text));
    }

    let segs = render_segments(bar);
    let right = if opts.show_total {
        format!(
            r#"<div class="bar-right">{}</div>"#,
            escape_html(&opts.format_total(bar.total_count))
        )
    } else {
        String::new()
    };

    if bar.outside_labels().next().is_none() {
        return format!(
            r#"<div class="bar-row"><div class="stacked-bar">{segs}</div>{right}</div>"#
        );
    }

    let top = render_label_side(bar, LabelMode::OutsideAbove, opts);
    let bottom = render_label_side(bar, LabelMode::OutsideBelow, opts);
    format!(
        concat!(
            r#"<div class="bar-container">"#,
            r#"<div class="bar-content">{top}<div class="stacked-bar">{segs}</div>{bottom}</div>"#,
            "{right}</div>"
        ),
        top = top,
        segs = segs,
        bottom = bottom,
        right = right,
    )
}

fn render_segments(bar: &BarLayout) -> String {
    let mut out = String::new();
    for seg in bar.segments.iter().filter(|s| s.mode != LabelMode::Hidden) {
        let title = escape_html(&format!("{} {:.1}%", seg.label, seg.raw_pct));
        let _ = write!(
            out,
            r#"<div class="seg" style="left:{:.6}%;width:{:.6}%;background:{};" title="{}">"#,
            seg.offset_pct, seg.display_pct, seg.color, title
        );
        if !seg.inside_text.is_empty() {
            let _ = write!(
                out,
                r#"<span class="seg-label">{}</span>"#,
                escape_html(&seg.inside_text)
            );
        }
        out.push_str("</div>");
    }
    out
}

/// Label rows on one side. Above the bar the farthest row comes first; below
/// it the nearest row comes first, so rows read outward from the bar.
fn render_label_side(bar: &BarLayout, side: LabelMode, opts: &RenderOptions) -> String {
    let rows = bar.rows_on(side);
    if rows == 0 {
        return String::new();
    }
    let (container, direction) = match side {
        LabelMode::OutsideBelow => ("outside-labels-bottom", "to-top"),
        _ => ("outside-labels-top", "to-bottom"),
    };
    let on_side: Vec<&SegmentLayout> = bar.segments.iter().filter(|s| s.mode == side).collect();

    let tiers: Vec<u32> = match side {
        LabelMode::OutsideBelow => (0..rows).collect(),
        _ => (0..rows).rev().collect(),
    };

    let mut html = format!(r#"<div class="{container}">"#);
    for tier in tiers {
        let _ = write!(html, r#"<div class="label-layer-{}">"#, tier + 1);
        for seg in &on_side {
            if seg.tier == tier {
                let center = clamp_label_center(
                    seg.center_pct(),
                    &seg.outside_text,
                    opts.font_px,
                    opts.bar_width_px as f64,
                );
                let _ = write!(
                    html,
                    r#"<div class="outside-label" style="left:{:.2}%; transform:translateX(-50%);">{}</div>"#,
                    center,
                    escape_html(&seg.outside_text)
                );
            }
            // Leader lines cross every row between the bar and their label.
            if let Some(line) = seg.leader_line.filter(|_| tier <= seg.tier) {
                let _ = write!(
                    html,
                    r#"<div class="leader-line {}" style="left:{:.2}%; height:100%;"></div>"#,
                    direction, line.anchor_x
                );
            }
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

/// Legend strip: one swatch per option, in legend order.
pub fn render_legend(entries: &[LegendEntry]) -> String {
    let mut items = String::new();
    for e in entries {
        let _ = write!(
            items,
            r#"<span class="item"><span class="swatch" style="background:{}"></span>{}</span>"#,
            e.color,
            escape_html(&e.label)
        );
    }
    format!(r#"<div class="legend2">{items}</div>"#)
}

/// Titled bar block: `"<title> = <total>"` heading above the bar, total not
/// repeated on the right. Untitled bars render as [`render_bar`].
pub fn render_titled_bar(bar: &BarLayout, opts: &RenderOptions) -> String {
    let Some(title) = bar.title.as_deref() else {
        return render_bar(bar, opts);
    };
    let heading = if bar.is_empty() {
        escape_html(title)
    } else {
        escape_html(&format!("{} = {}", title, opts.format_total(bar.total_count)))
    };
    let inner = RenderOptions {
        show_total: false,
        ..opts.clone()
    };
    format!(
        r#"<div><div class="muted" style="margin-bottom:0.3mm;">{}</div>{}</div>"#,
        heading,
        render_bar(bar, &inner)
    )
}

/// A grouped comparison under one heading. Groups without responses are
/// skipped; when every group is empty the placeholder is shown instead.
pub fn render_group(heading: &str, bars: &[BarLayout], opts: &RenderOptions) -> String {
    let mut html = format!(r#"<div class="q-subheading">{}</div>"#, escape_html(heading));
    let non_empty: Vec<&BarLayout> = bars.iter().filter(|b| !b.is_empty()).collect();
    if non_empty.is_empty() {
        let _ = write!(
            html,
            r#"<div class="muted">{}</div>"#,
            escape_html(&opts.empty_text)
        );
        return html;
    }
    for bar in non_empty {
        html.push_str(&render_titled_bar(bar, opts));
    }
    html
}

/// Legend followed by every bar of the report.
pub fn render_report(report: &ReportLayout, opts: &RenderOptions) -> String {
    let mut html = render_legend(&report.legend);
    for bar in &report.bars {
        html.push_str(&render_titled_bar(bar, opts));
    }
    html
}
