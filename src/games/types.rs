use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Payout ratio as `(numerator, denominator)`, serialized as `[n, d]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PayoutRatio(pub u32, pub u32);

impl PayoutRatio {
    /// Single number bet
    pub const STRAIGHT: PayoutRatio = PayoutRatio(35, 1);

    /// Colour, high/low and odd/even bets
    pub const EVEN_MONEY: PayoutRatio = PayoutRatio(1, 1);

    pub fn numerator(&self) -> u32 {
        self.0
    }

    pub fn denominator(&self) -> u32 {
        self.1
    }

    /// Winnings for `amount` staked at this ratio
    pub fn winnings(&self, amount: f64) -> f64 {
        amount * f64::from(self.0) / f64::from(self.1)
    }
}

/// Largest integer every `f64` below it represents exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A money amount on the wire
///
/// Whole values serialize as JSON integers (`10`, not `10.0`); anything else
/// as a float. Deserializes from either.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub f64);

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT_INTEGER {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl From<f64> for Amount {
    fn from(amount: f64) -> Self {
        Amount(amount)
    }
}

/// `serialize_with` helper for plain `f64` amount fields
pub fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Amount(*amount).serialize(serializer)
}

/// Winning labels of one spin and what each of them pays
pub type Outcome = BTreeMap<String, PayoutRatio>;

/// Whether a resolved bet won or lost
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    Win,
    Lose,
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetResult::Win => write!(f, "win"),
            BetResult::Lose => write!(f, "lose"),
        }
    }
}

/// One line of a payout breakdown, serialized as `[label, amount, "win" | "lose"]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    into = "(String, Amount, BetResult)",
    from = "(String, Amount, BetResult)"
)]
pub struct BetResolution {
    pub label: String,
    pub amount: f64,
    pub result: BetResult,
}

impl BetResolution {
    pub fn win(label: String, amount: f64) -> Self {
        Self {
            label,
            amount,
            result: BetResult::Win,
        }
    }

    pub fn lose(label: String, amount: f64) -> Self {
        Self {
            label,
            amount,
            result: BetResult::Lose,
        }
    }
}

impl From<BetResolution> for (String, Amount, BetResult) {
    fn from(resolution: BetResolution) -> Self {
        (resolution.label, Amount(resolution.amount), resolution.result)
    }
}

impl From<(String, Amount, BetResult)> for BetResolution {
    fn from((label, Amount(amount), result): (String, Amount, BetResult)) -> Self {
        Self {
            label,
            amount,
            result,
        }
    }
}

/// Game rule violations raised by the table
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid bet on '{label}': {reason}")]
    InvalidBet { label: String, reason: String },
}
