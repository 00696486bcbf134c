//! Roulette wheel
//!
//! Variants are built by composing slot sets: the 36 numbered slots first,
//! then the zero extensions each variant carries.

use crate::games::types::{Outcome, PayoutRatio};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// One physical pocket on the wheel, tagged with every label it satisfies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    labels: Outcome,
}

impl Slot {
    /// Slot for a number in `1..=36`
    pub fn numbered(n: u8) -> Self {
        let mut labels = Outcome::new();
        labels.insert(n.to_string(), PayoutRatio::STRAIGHT);
        labels.insert(red_black(n).to_string(), PayoutRatio::EVEN_MONEY);
        labels.insert(hi_lo(n).to_string(), PayoutRatio::EVEN_MONEY);
        labels.insert(even_odd(n).to_string(), PayoutRatio::EVEN_MONEY);
        Self { labels }
    }

    /// Slot carrying a single label, used for the zero pockets
    pub fn single(label: &str, ratio: PayoutRatio) -> Self {
        let mut labels = Outcome::new();
        labels.insert(label.to_string(), ratio);
        Self { labels }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.labels
    }

    pub fn satisfies(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }
}

fn red_black(n: u8) -> &'static str {
    if RED_NUMBERS.contains(&n) {
        "Red"
    } else {
        "Black"
    }
}

fn hi_lo(n: u8) -> &'static str {
    if n >= 19 {
        "Hi"
    } else {
        "Lo"
    }
}

fn even_odd(n: u8) -> &'static str {
    if n % 2 == 0 {
        "Even"
    } else {
        "Odd"
    }
}

/// The 36 numbered slots shared by every variant
pub fn base_slots() -> Vec<Slot> {
    (1..=36).map(Slot::numbered).collect()
}

/// Append the single-zero pocket
pub fn with_zero(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.push(Slot::single("0", PayoutRatio::STRAIGHT));
    slots
}

/// Append the double-zero pocket
pub fn with_double_zero(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.push(Slot::single("00", PayoutRatio::STRAIGHT));
    slots
}

/// Supported wheel layouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WheelVariant {
    #[default]
    American,
    European,
}

impl WheelVariant {
    pub fn slots(self) -> Vec<Slot> {
        match self {
            WheelVariant::European => with_zero(base_slots()),
            WheelVariant::American => with_double_zero(with_zero(base_slots())),
        }
    }

    /// Variant named by a path segment: `eu...` is European, `us...` or
    /// `am...` American, case-insensitive. `None` for anything else.
    pub fn from_path_prefix(segment: &str) -> Option<Self> {
        let segment = segment.to_ascii_lowercase();
        if segment.starts_with("eu") {
            Some(WheelVariant::European)
        } else if segment.starts_with("us") || segment.starts_with("am") {
            Some(WheelVariant::American)
        } else {
            None
        }
    }
}

impl fmt::Display for WheelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelVariant::American => write!(f, "american"),
            WheelVariant::European => write!(f, "european"),
        }
    }
}

impl FromStr for WheelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "american" | "us" => Ok(WheelVariant::American),
            "european" | "eu" => Ok(WheelVariant::European),
            other => Err(format!(
                "unknown wheel variant '{}', expected 'american' or 'european'",
                other
            )),
        }
    }
}

/// A wheel with a fixed slot set and its own random source
#[derive(Debug, Clone)]
pub struct Wheel {
    variant: WheelVariant,
    slots: Vec<Slot>,
    rng: StdRng,
}

impl Wheel {
    /// Wheel seeded from OS entropy
    pub fn new(variant: WheelVariant) -> Self {
        Self::with_rng(variant, StdRng::from_entropy())
    }

    /// Wheel with a reproducible spin sequence
    pub fn seeded(variant: WheelVariant, seed: u64) -> Self {
        Self::with_rng(variant, StdRng::seed_from_u64(seed))
    }

    fn with_rng(variant: WheelVariant, rng: StdRng) -> Self {
        Self {
            variant,
            slots: variant.slots(),
            rng,
        }
    }

    /// Pick one slot uniformly and return its winning labels
    pub fn spin(&mut self) -> Outcome {
        // slots is never empty: every variant starts from base_slots()
        let index = self.rng.gen_range(0..self.slots.len());
        self.slots[index].outcome().clone()
    }

    pub fn variant(&self) -> WheelVariant {
        self.variant
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}
