//! Balance and streak bookkeeping.

use serde::{Deserialize, Serialize};

/// Running balance (signed currency units) and consecutive-completion streak.
///
/// Mutated incrementally by reconciliation and decisions; never recomputed
/// from day history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub balance: i64,
    pub streak: u32,
}

impl Ledger {
    pub fn new(balance: i64, streak: u32) -> Self {
        Self { balance, streak }
    }

    /// Reward a completed day.
    pub fn credit(&mut self, amount: i64) {
        self.balance = self.balance.saturating_add(amount);
        self.streak = self.streak.saturating_add(1);
    }

    /// Charge a missed day and break the streak.
    pub fn debit(&mut self, amount: i64) {
        self.balance = self.balance.saturating_sub(amount);
        self.streak = 0;
    }

    /// Charge `count` auto-missed days at `per_miss` each. Returns the total.
    pub fn penalize(&mut self, count: usize, per_miss: i64) -> i64 {
        let penalty = per_miss.saturating_mul(count as i64);
        if count > 0 {
            self.debit(penalty);
        }
        penalty
    }
}
