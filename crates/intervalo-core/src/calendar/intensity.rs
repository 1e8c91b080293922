use serde::{Deserialize, Serialize};

/// Heatmap bucket for a day's completed sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    None,
    Light,
    Moderate,
    Strong,
    Peak,
}

impl Intensity {
    pub fn from_sets(sets: u32) -> Self {
        match sets {
            0 => Intensity::None,
            1..=2 => Intensity::Light,
            3..=4 => Intensity::Moderate,
            5..=6 => Intensity::Strong,
            _ => Intensity::Peak,
        }
    }

    /// 0 (no activity) to 4 (peak).
    pub fn level(&self) -> u8 {
        *self as u8
    }
}
