//! Width normalization: raw counts to display percentages.
//!
//! Every non-empty segment gets at least `min_segment_width_pct` of the bar.
//! The width handed to floored segments is taken from the others in
//! proportion to their size, so the bar still sums to 100.
//!
//! ```
//! use surveybar::{LayoutConfig, normalize::normalize};
//!
//! let segs = normalize(&[("Yes", 995), ("No", 5)], &LayoutConfig::default())?;
//! assert!((segs[1].display_pct - 1.0).abs() < 1e-9);
//! assert!((segs[0].display_pct - 99.0).abs() < 1e-9);
//! # Ok::<(), surveybar::LayoutError>(())
//! ```

use crate::config::LayoutConfig;
use crate::error::{InputError, LayoutError, Result};
use crate::models::Segment;
use log::debug;

/// Upper bound on floor-set growth passes.
pub const MAX_NORMALIZE_PASSES: usize = 32;

/// Slack for comparing widths against the minimum.
const WIDTH_EPS: f64 = 1e-9;

/// Turn ordered `(label, count)` pairs into segments with display widths.
///
/// A bar whose counts are all zero is returned as all-zero segments. Counts
/// whose sum does not fit in a `u64` are rejected.
pub fn normalize<L: AsRef<str>>(counts: &[(L, i64)], config: &LayoutConfig) -> Result<Vec<Segment>> {
    config.validate()?;
    if counts.is_empty() {
        return Err(InputError::EmptySeries.into());
    }

    let mut checked: Vec<(&str, u64)> = Vec::with_capacity(counts.len());
    let mut total: u64 = 0;
    for (label, count) in counts {
        let label = label.as_ref();
        let count = u64::try_from(*count).map_err(|_| InputError::NegativeCount {
            label: label.to_string(),
            count: *count,
        })?;
        total = total
            .checked_add(count)
            .ok_or_else(|| InputError::CountOverflow {
                label: label.to_string(),
            })?;
        checked.push((label, count));
    }

    let weights: Vec<f64> = checked.iter().map(|(_, c)| *c as f64).collect();
    let raw_pcts = to_percentages(&weights);
    let display = if total == 0 {
        vec![0.0; weights.len()]
    } else {
        distribute(&raw_pcts, config.min_segment_width_pct)?
    };

    Ok(checked
        .into_iter()
        .zip(raw_pcts)
        .zip(display)
        .map(|(((label, raw_count), raw_pct), display_pct)| Segment {
            label: label.to_string(),
            raw_count,
            raw_pct,
            display_pct,
        })
        .collect())
}

/// Same algorithm over arbitrary non-negative weights; returns display widths.
///
/// Feeding the output back in yields the same widths.
pub fn normalize_weights(weights: &[f64], config: &LayoutConfig) -> Result<Vec<f64>> {
    config.validate()?;
    if weights.is_empty() {
        return Err(InputError::EmptySeries.into());
    }
    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(InputError::InvalidWeight { index, value }.into());
    }
    let raw_pcts = to_percentages(weights);
    if raw_pcts.iter().all(|p| *p == 0.0) {
        return Ok(raw_pcts);
    }
    distribute(&raw_pcts, config.min_segment_width_pct)
}

fn to_percentages(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| w / total * 100.0).collect()
}

/// Floor small segments and shrink the rest proportionally, growing the floor
/// set until no unfloored segment falls below the minimum.
fn distribute(raw_pcts: &[f64], min_pct: f64) -> Result<Vec<f64>> {
    let mut floored: Vec<bool> = raw_pcts.iter().map(|&p| p > 0.0 && p < min_pct).collect();

    for pass in 1..=MAX_NORMALIZE_PASSES {
        let floor_count = floored.iter().filter(|f| **f).count();
        let floor_width = floor_count as f64 * min_pct;
        if floor_width > 100.0 + WIDTH_EPS {
            return Err(LayoutError::Unnormalizable {
                floor_count,
                min_width_pct: min_pct,
            });
        }

        let free_total: f64 = raw_pcts
            .iter()
            .zip(&floored)
            .filter(|(_, f)| !**f)
            .map(|(p, _)| *p)
            .sum();
        // Subtracting the deficit proportionally is the same as rescaling the
        // free segments onto whatever the floor set leaves over.
        let scale = if free_total > 0.0 {
            (100.0 - floor_width) / free_total
        } else {
            0.0
        };
        let display: Vec<f64> = raw_pcts
            .iter()
            .zip(&floored)
            .map(|(&p, &f)| if f { min_pct } else { p * scale })
            .collect();

        let mut grew = false;
        for (i, &width) in display.iter().enumerate() {
            if !floored[i] && raw_pcts[i] > 0.0 && width < min_pct - WIDTH_EPS {
                floored[i] = true;
                grew = true;
            }
        }
        if !grew {
            debug!(
                "normalized {} segments in {} pass(es), {} floored",
                raw_pcts.len(),
                pass,
                floor_count
            );
            return Ok(display);
        }
    }

    Err(LayoutError::Unnormalizable {
        floor_count: floored.iter().filter(|f| **f).count(),
        min_width_pct: min_pct,
    })
}
