//! Text measurement and fitting for label boxes.

/// Horizontal padding around a label box, in pixels.
pub const LABEL_PADDING_PX: f64 = 10.0;

/// Heuristic pixel width of `text` (no font metrics available).
/// ASCII glyphs count 0.6 em, everything else (kana, kanji, full-width) 1 em.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> f64 {
    text.chars().map(|c| char_width_px(c, font_px)).sum()
}

fn char_width_px(c: char, font_px: u32) -> f64 {
    let em = font_px as f64;
    if c.is_ascii() { 0.6 * em } else { em }
}

/// Estimated label box width as a percentage of a bar `bar_width_px` wide.
pub fn label_width_pct(text: &str, font_px: u32, bar_width_px: f64) -> f64 {
    if text.is_empty() || bar_width_px <= 0.0 {
        return 0.0;
    }
    (estimate_text_width_px(text, font_px) + LABEL_PADDING_PX) / bar_width_px * 100.0
}

/// Move a label centre so its estimated box stays within the bar.
/// A label wider than the bar is centred.
pub fn clamp_label_center(center_pct: f64, text: &str, font_px: u32, bar_width_px: f64) -> f64 {
    let half = label_width_pct(text, font_px, bar_width_px) / 2.0;
    if half >= 50.0 {
        return 50.0;
    }
    center_pct.clamp(half, 100.0 - half)
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: f64) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let budget = max_px - estimate_text_width_px("…", font_px);
    let mut out = String::new();
    let mut used = 0.0;
    for ch in text.chars() {
        let w = char_width_px(ch, font_px);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if !out.is_empty() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_cost_a_full_em() {
        assert!((estimate_text_width_px("ab", 10) - 12.0).abs() < 1e-9);
        assert!((estimate_text_width_px("はい", 10) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn edge_labels_are_pulled_inside() {
        // "Yes" at 10px: 18 + 10 padding = 28px of 280px, i.e. 10%.
        let c = clamp_label_center(1.0, "Yes", 10, 280.0);
        assert!((c - 5.0).abs() < 1e-9);
        let c = clamp_label_center(99.0, "Yes", 10, 280.0);
        assert!((c - 95.0).abs() < 1e-9);
        let c = clamp_label_center(40.0, "Yes", 10, 280.0);
        assert!((c - 40.0).abs() < 1e-9);
    }

    #[test]
    fn truncation_adds_one_ellipsis() {
        let t = truncate_to_width("abcdefghij", 10, 40.0);
        assert!(t.ends_with('…'));
        assert!(estimate_text_width_px(&t, 10) <= 40.0);
        assert_eq!(truncate_to_width("abc", 10, 40.0), "abc");
    }
}
