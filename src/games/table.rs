use crate::games::types::{BetResolution, GameError, Outcome, PayoutRatio};
use std::collections::HashMap;

pub const DEFAULT_STAKE: f64 = 100.0;

/// Highest ratio any slot pays
const MAX_PAYOUT: PayoutRatio = PayoutRatio::STRAIGHT;

/// Cash stake plus the bets currently on the felt
///
/// The stake is signed and never clamped: a player may go below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    stake: f64,
    bets: HashMap<String, f64>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_STAKE)
    }
}

impl Table {
    pub fn new(stake: f64) -> Self {
        Self {
            stake,
            bets: HashMap::new(),
        }
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    pub fn bets(&self) -> &HashMap<String, f64> {
        &self.bets
    }

    /// Add `amount` to the bet on `label`, creating it if needed
    pub fn place_bet(&mut self, label: &str, amount: f64) -> Result<(), GameError> {
        self.place_bets([(label.to_string(), amount)])
    }

    /// Place several bets, all or nothing
    ///
    /// Rejected when any amount is invalid, or when the resulting bets could
    /// push the stake past what an `f64` holds on the next spin.
    pub fn place_bets<I>(&mut self, bets: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut staged = self.bets.clone();
        for (label, amount) in bets {
            validate_bet(&label, amount)?;
            *staged.entry(label).or_insert(0.0) += amount;
        }
        self.check_exposure(&staged)?;
        self.bets = staged;
        Ok(())
    }

    /// Best and worst case stake after resolving `bets` must stay finite
    fn check_exposure(&self, bets: &HashMap<String, f64>) -> Result<(), GameError> {
        let mut best = self.stake;
        let mut worst = self.stake;
        for (label, amount) in bets {
            let winnings = MAX_PAYOUT.winnings(*amount);
            best += winnings;
            worst -= amount;
            if !(amount.is_finite() && winnings.is_finite() && best.is_finite() && worst.is_finite()) {
                return Err(GameError::InvalidBet {
                    label: label.clone(),
                    reason: format!("total of {} on the table is too large", amount),
                });
            }
        }
        Ok(())
    }

    /// Settle every active bet against `outcome` and drain the bets
    ///
    /// Iteration order over bets is unspecified.
    pub fn resolve(&mut self, outcome: &Outcome) -> Vec<BetResolution> {
        let mut details = Vec::with_capacity(self.bets.len());
        for (label, amount) in self.bets.drain() {
            match outcome.get(&label) {
                Some(ratio) => {
                    self.stake += ratio.winnings(amount);
                    details.push(BetResolution::win(label, amount));
                }
                None => {
                    self.stake -= amount;
                    details.push(BetResolution::lose(label, amount));
                }
            }
        }
        details
    }

    pub fn clear_bets(&mut self) {
        self.bets.clear();
    }
}

fn validate_bet(label: &str, amount: f64) -> Result<(), GameError> {
    if label.is_empty() {
        return Err(GameError::InvalidBet {
            label: label.to_string(),
            reason: "label must not be empty".to_string(),
        });
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(GameError::InvalidBet {
            label: label.to_string(),
            reason: format!("amount must be positive, got {}", amount),
        });
    }
    Ok(())
}
