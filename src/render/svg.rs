//! SVG preview of a report, drawn through plotters' SVG backend.
//!
//! Layout, top to bottom: legend rows, then one block per bar (title line,
//! label rows above, the bar, label rows below). Pixel geometry of bar and
//! label rows comes from the same [`LayoutConfig`] the layout was built with.

use super::RenderOptions;
use super::text::{clamp_label_center, estimate_text_width_px, truncate_to_width};
use crate::config::LayoutConfig;
use crate::legend::{OTHER_GRAY, Rgb8};
use crate::models::{BarLayout, LabelMode, LegendEntry, ReportLayout};
use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::fs;
use std::path::Path;

const MARGIN_PX: i32 = 20;
const BAR_GAP_PX: i32 = 16;
const TITLE_GAP_PX: i32 = 6;
const TOTAL_COLUMN_PX: i32 = 90;
const SWATCH_PX: i32 = 10;
const LEGEND_ITEM_GAP_PX: i32 = 16;
const LEADER_GRAY: RGBColor = RGBColor(0x99, 0x99, 0x99);
const LABEL_GRAY: RGBColor = RGBColor(0x33, 0x33, 0x33);

/// Render the whole report to an SVG document string.
pub fn render_svg(report: &ReportLayout, config: &LayoutConfig, opts: &RenderOptions) -> Result<String> {
    let size = canvas_size(report, config, opts);
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw_report(&root, report, config, opts)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Render and write to `path`.
pub fn write_svg<P: AsRef<Path>>(
    report: &ReportLayout,
    config: &LayoutConfig,
    opts: &RenderOptions,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let svg = render_svg(report, config, opts)?;
    fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn line_height(opts: &RenderOptions) -> i32 {
    opts.font_px as i32 + 4
}

fn total_column(opts: &RenderOptions) -> i32 {
    if opts.show_total { TOTAL_COLUMN_PX } else { 0 }
}

/// Top-left corners of legend items relative to the legend origin, plus the
/// legend's total height. Items flow left to right and wrap at the bar width.
fn legend_layout(entries: &[LegendEntry], opts: &RenderOptions) -> (Vec<(i32, i32)>, i32) {
    if entries.is_empty() {
        return (Vec::new(), 0);
    }
    let max_w = opts.bar_width_px as i32;
    let line_h = line_height(opts);
    let (mut x, mut y) = (0, 0);
    let mut positions = Vec::with_capacity(entries.len());
    for e in entries {
        let w = SWATCH_PX + 4 + estimate_text_width_px(&e.label, opts.font_px).ceil() as i32;
        if x > 0 && x + w > max_w {
            x = 0;
            y += line_h;
        }
        positions.push((x, y));
        x += w + LEGEND_ITEM_GAP_PX;
    }
    (positions, y + line_h + BAR_GAP_PX)
}

fn bar_block_height(bar: &BarLayout, config: &LayoutConfig, opts: &RenderOptions) -> i32 {
    let title = if bar.title.is_some() {
        line_height(opts) + TITLE_GAP_PX
    } else {
        0
    };
    if bar.is_empty() {
        return title + line_height(opts) + BAR_GAP_PX;
    }
    let row_h = config.label_row_height_px.round() as i32;
    let rows = (bar.rows_on(LabelMode::OutsideAbove) + bar.rows_on(LabelMode::OutsideBelow)) as i32;
    title + rows * row_h + config.bar_height_px.round() as i32 + BAR_GAP_PX
}

fn canvas_size(report: &ReportLayout, config: &LayoutConfig, opts: &RenderOptions) -> (u32, u32) {
    let (_, legend_h) = legend_layout(&report.legend, opts);
    let bars_h: i32 = report
        .bars
        .iter()
        .map(|b| bar_block_height(b, config, opts))
        .sum();
    let w = 2 * MARGIN_PX + opts.bar_width_px as i32 + total_column(opts);
    let h = 2 * MARGIN_PX + legend_h + bars_h;
    (w.max(1) as u32, h.max(1) as u32)
}

fn rgb_color(hex: &str) -> RGBColor {
    let c = Rgb8::from_hex(hex).unwrap_or(OTHER_GRAY);
    RGBColor(c.r, c.g, c.b)
}

fn text_style<'a>(opts: &RenderOptions, h: HPos, color: &'a RGBColor) -> TextStyle<'a> {
    TextStyle::from((FontFamily::SansSerif, opts.font_px))
        .pos(Pos::new(h, VPos::Center))
        .color(color)
}

fn draw_report<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    report: &ReportLayout,
    config: &LayoutConfig,
    opts: &RenderOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let x0 = MARGIN_PX;
    let mut y = MARGIN_PX;

    let (positions, legend_h) = legend_layout(&report.legend, opts);
    let line_h = line_height(opts);
    for (entry, (dx, dy)) in report.legend.iter().zip(positions) {
        let (sx, sy) = (x0 + dx, y + dy + (line_h - SWATCH_PX) / 2);
        root.draw(&Rectangle::new(
            [(sx, sy), (sx + SWATCH_PX, sy + SWATCH_PX)],
            rgb_color(&entry.color).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            entry.label.as_str(),
            (sx + SWATCH_PX + 4, y + dy + line_h / 2),
            text_style(opts, HPos::Left, &BLACK),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    y += legend_h;

    for bar in &report.bars {
        draw_bar(root, bar, config, opts, x0, y)?;
        y += bar_block_height(bar, config, opts);
    }
    Ok(())
}

fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bar: &BarLayout,
    config: &LayoutConfig,
    opts: &RenderOptions,
    x0: i32,
    mut y: i32,
) -> Result<()> {
    let line_h = line_height(opts);
    let bar_w = opts.bar_width_px as f64;
    let px = |pct: f64| x0 + (pct / 100.0 * bar_w).round() as i32;

    if let Some(title) = &bar.title {
        root.draw(&Text::new(
            title.as_str(),
            (x0, y + line_h / 2),
            text_style(opts, HPos::Left, &BLACK),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        y += line_h + TITLE_GAP_PX;
    }

    if bar.is_empty() {
        root.draw(&Text::new(
            opts.empty_text.as_str(),
            (x0, y + line_h / 2),
            text_style(opts, HPos::Left, &LEADER_GRAY),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        return Ok(());
    }

    let row_h = config.label_row_height_px;
    let bar_h = config.bar_height_px.round() as i32;
    let bar_top = y + bar.rows_on(LabelMode::OutsideAbove) as i32 * row_h.round() as i32;
    let bar_mid = bar_top + bar_h / 2;

    for seg in bar.segments.iter().filter(|s| s.mode != LabelMode::Hidden) {
        let (left, right) = (px(seg.offset_pct), px(seg.offset_pct + seg.display_pct));
        let fill = rgb_color(&seg.color);
        root.draw(&Rectangle::new([(left, bar_top), (right, bar_top + bar_h)], fill.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;

        if !seg.inside_text.is_empty() {
            let text = truncate_to_width(&seg.inside_text, opts.font_px, (right - left - 4) as f64);
            if !text.is_empty() {
                let light = Rgb8::from_hex(&seg.color).is_some_and(Rgb8::is_light);
                let ink: &RGBColor = if light { &BLACK } else { &WHITE };
                root.draw(&Text::new(
                    text,
                    ((left + right) / 2, bar_mid),
                    text_style(opts, HPos::Center, ink),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
            }
        }

        if !seg.mode.is_outside() {
            continue;
        }
        let offset = seg.tier as f64 * row_h + row_h / 2.0;
        let label_y = match seg.mode {
            LabelMode::OutsideBelow => bar_top + bar_h + offset.round() as i32,
            _ => bar_top - offset.round() as i32,
        };
        let center = clamp_label_center(seg.center_pct(), &seg.outside_text, opts.font_px, bar_w);
        root.draw(&Text::new(
            seg.outside_text.as_str(),
            (px(center), label_y),
            text_style(opts, HPos::Center, &LABEL_GRAY),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

        if let Some(line) = seg.leader_line {
            let x = px(line.anchor_x);
            root.draw(&PathElement::new(
                vec![
                    (x, bar_top + line.anchor_y.round() as i32),
                    (x, bar_top + line.label_y.round() as i32),
                ],
                LEADER_GRAY.stroke_width(1),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if opts.show_total {
        root.draw(&Text::new(
            opts.format_total(bar.total_count),
            (px(100.0) + 8, bar_mid),
            text_style(opts, HPos::Left, &BLACK),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
