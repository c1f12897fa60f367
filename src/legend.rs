//! Report-scoped legend: option label to a stable color.
//!
//! The first time a label is seen it takes the next palette slot; after that
//! it keeps that color for every bar of the report. Reserved labels (such as
//! the catch-all "Other" option) have a fixed color and do not consume a slot.
//! One `Legend` belongs to one report run; call [`Legend::reset`] or build a
//! new one for the next report.

use crate::models::LegendEntry;
use ahash::AHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Relative luminance test (ITU-R BT.601 weights); light fills want dark text.
    pub fn is_light(self) -> bool {
        let y = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        y > 160.0
    }
}

/// Survey report series palette.
pub const SURVEY15: [Rgb8; 15] = [
    Rgb8::new(0x4c, 0x8b, 0xf5), // blue
    Rgb8::new(0xf5, 0x8b, 0x4c), // orange
    Rgb8::new(0x57, 0xb2, 0x6a), // green
    Rgb8::new(0x91, 0x66, 0xcc), // purple
    Rgb8::new(0xe0, 0x4f, 0x5f), // red
    Rgb8::new(0x39, 0xc0, 0xcf), // cyan
    Rgb8::new(0xf2, 0xc9, 0x4c), // yellow
    Rgb8::new(0x7f, 0x8c, 0x8d), // slate
    Rgb8::new(0x2e, 0xcc, 0x71), // emerald
    Rgb8::new(0xe6, 0x7e, 0x22), // carrot
    Rgb8::new(0x9b, 0x59, 0xb6), // amethyst
    Rgb8::new(0x1a, 0xbc, 0x9c), // turquoise
    Rgb8::new(0xe8, 0x43, 0x93), // pink
    Rgb8::new(0x09, 0x84, 0xe3), // azure
    Rgb8::new(0x6c, 0x5c, 0xe7), // indigo
];

/// Fixed color for catch-all options.
pub const OTHER_GRAY: Rgb8 = Rgb8::new(0xb5, 0xb5, 0xb5);

#[derive(Clone, Debug)]
pub struct Legend {
    palette: Vec<Rgb8>,
    reserved: AHashMap<String, Rgb8>,
    assigned: AHashMap<String, Rgb8>,
    order: Vec<String>,
    next_slot: usize,
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Legend {
    pub fn new() -> Self {
        Self::with_palette(SURVEY15.to_vec())
    }

    /// An empty `palette` falls back to [`SURVEY15`].
    pub fn with_palette(palette: Vec<Rgb8>) -> Self {
        let palette = if palette.is_empty() {
            SURVEY15.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            reserved: AHashMap::new(),
            assigned: AHashMap::new(),
            order: Vec::new(),
            next_slot: 0,
        }
    }

    /// Pin `label` to `color`. Survives [`Legend::reset`].
    pub fn reserve(&mut self, label: impl Into<String>, color: Rgb8) -> &mut Self {
        self.reserved.insert(label.into(), color);
        self
    }

    /// Color for `label`, assigning the next slot on first encounter.
    pub fn color_for(&mut self, label: &str) -> Rgb8 {
        if let Some(c) = self.assigned.get(label) {
            return *c;
        }
        let color = match self.reserved.get(label) {
            Some(c) => *c,
            None => {
                let c = self.palette[self.next_slot % self.palette.len()];
                self.next_slot += 1;
                c
            }
        };
        self.assigned.insert(label.to_string(), color);
        self.order.push(label.to_string());
        color
    }

    /// Assign colors up front, in the given order.
    pub fn seed<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for label in labels {
            self.color_for(label.as_ref());
        }
    }

    /// Lookup without assigning.
    pub fn get(&self, label: &str) -> Option<Rgb8> {
        self.assigned.get(label).copied()
    }

    /// Assigned labels in first-seen order.
    pub fn entries(&self) -> Vec<LegendEntry> {
        self.order
            .iter()
            .filter_map(|label| {
                self.assigned.get(label).map(|c| LegendEntry {
                    label: label.clone(),
                    color: c.hex(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget all assignments; palette and reservations stay.
    pub fn reset(&mut self) {
        self.assigned.clear();
        self.order.clear();
        self.next_slot = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_and_rejects_garbage() {
        assert_eq!(Rgb8::from_hex("#b5b5b5"), Some(OTHER_GRAY));
        assert_eq!(OTHER_GRAY.hex(), "#b5b5b5");
        assert_eq!(Rgb8::from_hex("#12345"), None);
        assert_eq!(Rgb8::from_hex("zzzzzz"), None);
    }

    #[test]
    fn reserved_label_does_not_consume_a_slot() {
        let mut legend = Legend::new();
        legend.reserve("Other", OTHER_GRAY);
        assert_eq!(legend.color_for("Other"), OTHER_GRAY);
        assert_eq!(legend.color_for("Yes"), SURVEY15[0]);
        assert_eq!(legend.color_for("No"), SURVEY15[1]);
    }

    #[test]
    fn palette_wraps() {
        let mut legend = Legend::with_palette(vec![Rgb8::new(1, 2, 3), Rgb8::new(4, 5, 6)]);
        legend.seed(["a", "b", "c"]);
        assert_eq!(legend.get("c"), Some(Rgb8::new(1, 2, 3)));
    }

    #[test]
    fn yellow_is_light() {
        assert!(SURVEY15[6].is_light());
        assert!(!SURVEY15[0].is_light());
    }
}
