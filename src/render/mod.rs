//! Renderers for layout descriptors: report HTML fragments and an SVG preview.
//!
//! - `html`: the bar markup the survey report pages embed (`seg` boxes,
//!   label layers, leader lines, legend strip)
//! - `svg`: a self-contained SVG drawing of a whole report via plotters
//! - `text`: width estimates used to keep outside labels inside the bar

pub mod html;
pub mod svg;
pub mod text;

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Rendering knobs shared by the HTML and SVG renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Physical bar width used for label-width estimates (180 mm is about 680 px).
    pub bar_width_px: u32,
    pub font_px: u32,
    /// Suffix after the total count, e.g. `"人"` or `" responses"`.
    pub unit: String,
    /// Show the total count to the right of each bar.
    pub show_total: bool,
    /// Locale tag for thousands separators (`en`, `de`, `fr`, ...).
    pub locale: String,
    /// Placeholder shown for a bar without responses.
    pub empty_text: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bar_width_px: 680,
            font_px: 11,
            unit: String::new(),
            show_total: true,
            locale: "en".to_string(),
            empty_text: "No data".to_string(),
        }
    }
}

impl RenderOptions {
    /// Total with thousands separators and the unit suffix.
    pub fn format_total(&self, total: u64) -> String {
        format!(
            "{}{}",
            total.to_formatted_string(map_locale(&self.locale)),
            self.unit
        )
    }
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`, `ja`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        "ja" | "ja_jp" => &Locale::ja,
        _ => &Locale::en,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_use_locale_separators() {
        let mut opts = RenderOptions {
            unit: "人".into(),
            ..RenderOptions::default()
        };
        assert_eq!(opts.format_total(12345), "12,345人");
        opts.locale = "de".into();
        assert_eq!(opts.format_total(12345), "12.345人");
    }
}
