//! Error types for the layout engine.
//!
//! The engine itself only fails on bad input or on a minimum width that cannot
//! fit; a bar whose counts are all zero is a valid (empty) layout, not an error.

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error(
        "cannot normalize bar: {floor_count} segments at the {min_width_pct}% minimum need more than 100% of the bar"
    )]
    Unnormalizable {
        floor_count: usize,
        min_width_pct: f64,
    },
}

/// Input rejected before any normalization takes place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("series is empty")]
    EmptySeries,

    #[error("negative count {count} for option {label:?}")]
    NegativeCount { label: String, count: i64 },

    #[error("total count overflows at option {label:?}")]
    CountOverflow { label: String },

    #[error("weight #{index} is {value}; weights must be finite and non-negative")]
    InvalidWeight { index: usize, value: f64 },

    #[error("{name} = {value} is outside [0, 100]")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("{name} = {value} must be a positive, finite pixel size")]
    InvalidGeometry { name: &'static str, value: f64 },
}

impl LayoutError {
    /// True for errors the caller caused by passing malformed data or config.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LayoutError::InvalidInput(_))
    }
}
