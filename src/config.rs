//! Layout thresholds and geometry.
//!
//! Defaults are process-wide constants. A render call takes its own
//! [`LayoutConfig`] value (optionally a preset or a JSON file with
//! [`LayoutOverrides`] applied on top); the composer keeps a validated copy
//! for the whole run.

use crate::error::{InputError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minimum visible width of a non-empty segment (percent of the bar).
pub const DEFAULT_MIN_SEGMENT_WIDTH_PCT: f64 = 1.0;
/// Segments at or above this share keep their label inside the bar.
pub const DEFAULT_OUTSIDE_LABEL_THRESHOLD_PCT: f64 = 30.0;
/// Outside-labelled segments at or above this share still show their percentage inside.
pub const DEFAULT_OUTSIDE_LABEL_INNER_PCT_THRESHOLD: f64 = 10.0;
/// Height of the bar itself, in pixels.
pub const DEFAULT_BAR_HEIGHT_PX: f64 = 24.0;
/// Height of one row of outside labels, in pixels.
pub const DEFAULT_LABEL_ROW_HEIGHT_PX: f64 = 14.0;

/// Thresholds of the later report revision (narrower bars, more inside labels).
pub const REVISED_OUTSIDE_LABEL_THRESHOLD_PCT: f64 = 24.0;
pub const REVISED_OUTSIDE_LABEL_INNER_PCT_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_segment_width_pct: f64,
    pub outside_label_threshold_pct: f64,
    pub outside_label_inner_pct_threshold: f64,
    pub bar_height_px: f64,
    pub label_row_height_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_segment_width_pct: DEFAULT_MIN_SEGMENT_WIDTH_PCT,
            outside_label_threshold_pct: DEFAULT_OUTSIDE_LABEL_THRESHOLD_PCT,
            outside_label_inner_pct_threshold: DEFAULT_OUTSIDE_LABEL_INNER_PCT_THRESHOLD,
            bar_height_px: DEFAULT_BAR_HEIGHT_PX,
            label_row_height_px: DEFAULT_LABEL_ROW_HEIGHT_PX,
        }
    }
}

/// Named threshold sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// 30% outside threshold, 10% inner threshold.
    #[default]
    Classic,
    /// 24% outside threshold, 5% inner threshold.
    Revised,
}

/// Per-call overrides; `None` keeps the base value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutOverrides {
    pub min_segment_width_pct: Option<f64>,
    pub outside_label_threshold_pct: Option<f64>,
    pub outside_label_inner_pct_threshold: Option<f64>,
    pub bar_height_px: Option<f64>,
    pub label_row_height_px: Option<f64>,
}

impl LayoutConfig {
    pub fn revised() -> Self {
        Self {
            outside_label_threshold_pct: REVISED_OUTSIDE_LABEL_THRESHOLD_PCT,
            outside_label_inner_pct_threshold: REVISED_OUTSIDE_LABEL_INNER_PCT_THRESHOLD,
            ..Self::default()
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Classic => Self::default(),
            Preset::Revised => Self::revised(),
        }
    }

    /// Return a copy with every `Some` field of `overrides` applied.
    pub fn with_overrides(mut self, overrides: &LayoutOverrides) -> Self {
        if let Some(v) = overrides.min_segment_width_pct {
            self.min_segment_width_pct = v;
        }
        if let Some(v) = overrides.outside_label_threshold_pct {
            self.outside_label_threshold_pct = v;
        }
        if let Some(v) = overrides.outside_label_inner_pct_threshold {
            self.outside_label_inner_pct_threshold = v;
        }
        if let Some(v) = overrides.bar_height_px {
            self.bar_height_px = v;
        }
        if let Some(v) = overrides.label_row_height_px {
            self.label_row_height_px = v;
        }
        self
    }

    /// Reject thresholds outside `[0, 100]` and non-positive pixel sizes.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("min_segment_width_pct", self.min_segment_width_pct),
            ("outside_label_threshold_pct", self.outside_label_threshold_pct),
            (
                "outside_label_inner_pct_threshold",
                self.outside_label_inner_pct_threshold,
            ),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(InputError::ThresholdOutOfRange { name, value }.into());
            }
        }
        let geometry = [
            ("bar_height_px", self.bar_height_px),
            ("label_row_height_px", self.label_row_height_px),
        ];
        for (name, value) in geometry {
            if !value.is_finite() || value <= 0.0 {
                return Err(InputError::InvalidGeometry { name, value }.into());
            }
        }
        Ok(())
    }

    /// Load a (possibly partial) config from JSON; missing fields take the defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading layout config {}", path.display()))?;
        let config: LayoutConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing layout config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: LayoutConfig =
            serde_json::from_str(r#"{ "outside_label_threshold_pct": 24.0 }"#).unwrap();
        assert_eq!(cfg.outside_label_threshold_pct, 24.0);
        assert_eq!(cfg.min_segment_width_pct, DEFAULT_MIN_SEGMENT_WIDTH_PCT);
        assert_eq!(
            cfg.outside_label_inner_pct_threshold,
            DEFAULT_OUTSIDE_LABEL_INNER_PCT_THRESHOLD
        );
    }

    #[test]
    fn geometry_must_be_positive() {
        let cfg = LayoutConfig {
            label_row_height_px: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LayoutError::InvalidInput(InputError::InvalidGeometry {
                name: "label_row_height_px",
                ..
            }))
        ));
    }
}
