//! surveybar
//!
//! Stacked-bar layout engine for survey reports. Takes already-aggregated
//! `(option, count)` series and computes a stable rendering layout: segment
//! widths with a guaranteed minimum, inside/outside labels, tiered outside
//! labels with leader lines, and legend colors shared across a report.
//!
//! ### Features
//! - Minimum-width normalization that keeps every bar at exactly 100%
//! - Label policy on the true share: inside, name-outside, or fully outside
//! - Outside labels alternating above/below with leader lines past the first row
//! - Grouped comparisons as flat sibling bars sharing one legend
//! - HTML fragments, an SVG preview, JSON/CSV export of the layout
//!
//! ### Example
//! ```
//! use surveybar::{BarComposer, LabelMode, LayoutConfig};
//!
//! let mut composer = BarComposer::new(LayoutConfig::default())?;
//! let bar = composer.compose(Some("Q1"), &[("Yes", 970), ("No", 20), ("Unsure", 10)])?;
//! assert_eq!(bar.segments[0].mode, LabelMode::Inside);
//! assert_eq!(bar.segments[1].mode, LabelMode::OutsideAbove);
//! assert_eq!(bar.segments[2].mode, LabelMode::OutsideBelow);
//! let report = composer.finish(vec![bar]);
//! assert_eq!(report.legend.len(), 3);
//! # Ok::<(), surveybar::LayoutError>(())
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod legend;
pub mod models;
pub mod normalize;
pub mod placement;
pub mod render;
pub mod storage;

pub use compose::{BarComposer, compose_bar, overall_order};
pub use config::{LayoutConfig, LayoutOverrides, Preset};
pub use error::{InputError, LayoutError};
pub use legend::{Legend, Rgb8};
pub use models::{
    BarLayout, GroupSeries, LabelMode, LabelPlacement, LeaderLine, LegendEntry, ReportLayout,
    Segment, SegmentLayout,
};
pub use render::RenderOptions;
