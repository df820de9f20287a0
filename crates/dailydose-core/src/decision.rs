//! Decision processor: applies "completed" / "missed" to the pending day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::day::{DayId, DayStatus};
use crate::error::DecisionError;
use crate::feedback::FeedbackProvider;
use crate::ledger::Ledger;
use crate::storage::RewardsConfig;
use crate::tracker::TrackerState;

/// The user's answer for a pending day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Completed,
    Missed,
}

impl Decision {
    pub fn resulting_status(self) -> DayStatus {
        match self {
            Decision::Completed => DayStatus::Taken,
            Decision::Missed => DayStatus::Missed,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Completed => f.write_str("completed"),
            Decision::Missed => f.write_str("missed"),
        }
    }
}

/// What a successful decision did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub day_id: DayId,
    pub date: NaiveDate,
    pub decision: Decision,
    pub status: DayStatus,
    /// Signed change applied to the balance.
    pub delta: i64,
    pub bonus: bool,
    pub ledger: Ledger,
    pub message: String,
}

/// Applies decisions using the configured reward schedule.
#[derive(Debug, Clone)]
pub struct DecisionProcessor {
    rewards: RewardsConfig,
}

impl DecisionProcessor {
    pub fn new(rewards: RewardsConfig) -> Self {
        Self { rewards }
    }

    /// Resolve the pending day `id` and update the ledger.
    ///
    /// # Errors
    /// Returns `DecisionError::UnknownDay` for ids outside the range and
    /// `DecisionError::NotPending` when the day is not `Pending`. Neither
    /// case mutates `state`.
    pub fn apply(
        &self,
        state: &mut TrackerState,
        id: DayId,
        decision: Decision,
        feedback: &dyn FeedbackProvider,
    ) -> Result<DecisionOutcome, DecisionError> {
        let day = state
            .days
            .get_mut(id.index())
            .filter(|d| d.id == id)
            .ok_or(DecisionError::UnknownDay(id))?;

        if !day.is_pending() {
            return Err(DecisionError::NotPending {
                id,
                status: day.status,
            });
        }

        let bonus = decision == Decision::Completed && self.rewards.is_bonus_date(day.date);
        let delta = match decision {
            Decision::Completed => {
                let reward = self.rewards.reward_for(day.date);
                state.ledger.credit(reward);
                reward
            }
            Decision::Missed => {
                state.ledger.debit(self.rewards.standard_penalty);
                -self.rewards.standard_penalty
            }
        };

        let message = feedback.phrase(decision, self.rewards.is_bonus_date(day.date));
        let status = decision.resulting_status();
        day.resolve(status, message.clone());

        info!(
            %id,
            date = %day.date,
            %decision,
            delta,
            balance = state.ledger.balance,
            streak = state.ledger.streak,
            "decision recorded"
        );

        Ok(DecisionOutcome {
            day_id: id,
            date: day.date,
            decision,
            status,
            delta,
            bonus,
            ledger: state.ledger,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{generate_days, DayRange};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed(_: Decision, bonus: bool) -> String {
        if bonus {
            "bonus".to_string()
        } else {
            "note".to_string()
        }
    }

    fn state_with_pending(index: usize, ledger: Ledger) -> TrackerState {
        let range = DayRange::new(date(2025, 12, 2), date(2025, 12, 10)).unwrap();
        let mut days = generate_days(&range);
        days[index].status = DayStatus::Pending;
        TrackerState { days, ledger }
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        let mut state = state_with_pending(0, Ledger::default());
        let outcome = processor
            .apply(&mut state, DayId(0), Decision::Completed, &fixed)
            .unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["dayId"], "day-0");
        assert_eq!(json["decision"], "completed");
        assert_eq!(json["status"], "TAKEN");
        assert!(json.get("day_id").is_none());
    }

    #[test]
    fn completed_pays_standard_reward() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        let mut state = state_with_pending(1, Ledger::new(100, 2));
        let outcome = processor
            .apply(&mut state, DayId(1), Decision::Completed, &fixed)
            .unwrap();

        assert_eq!(outcome.delta, 500);
        assert!(!outcome.bonus);
        assert_eq!(state.ledger, Ledger::new(600, 3));
        assert_eq!(state.days[1].status, DayStatus::Taken);
        assert_eq!(state.days[1].note.as_deref(), Some("note"));
    }

    #[test]
    fn completed_on_bonus_date_pays_bonus() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        // index 3 is 2025-12-05
        let mut state = state_with_pending(3, Ledger::default());
        let outcome = processor
            .apply(&mut state, DayId(3), Decision::Completed, &fixed)
            .unwrap();

        assert_eq!(outcome.delta, 30_000);
        assert!(outcome.bonus);
        assert_eq!(outcome.message, "bonus");
        assert_eq!(state.ledger, Ledger::new(30_000, 1));
    }

    #[test]
    fn missed_charges_penalty_and_resets_streak() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        let mut state = state_with_pending(0, Ledger::new(1500, 3));
        let outcome = processor
            .apply(&mut state, DayId(0), Decision::Missed, &fixed)
            .unwrap();

        assert_eq!(outcome.delta, -1000);
        assert_eq!(outcome.status, DayStatus::Missed);
        assert_eq!(state.ledger, Ledger::new(500, 0));
    }

    #[test]
    fn non_pending_day_is_rejected_without_mutation() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        for status in [DayStatus::Locked, DayStatus::Taken, DayStatus::Missed] {
            let mut state = state_with_pending(0, Ledger::new(700, 2));
            state.days[1].status = status;
            let before = state.clone();

            for decision in [Decision::Completed, Decision::Missed] {
                let err = processor
                    .apply(&mut state, DayId(1), decision, &fixed)
                    .unwrap_err();
                assert_eq!(
                    err,
                    DecisionError::NotPending {
                        id: DayId(1),
                        status
                    }
                );
                assert_eq!(state, before);
            }
        }
    }

    #[test]
    fn unknown_day_is_rejected() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        let mut state = state_with_pending(0, Ledger::default());
        let err = processor
            .apply(&mut state, DayId(99), Decision::Completed, &fixed)
            .unwrap_err();
        assert_eq!(err, DecisionError::UnknownDay(DayId(99)));
    }

    #[test]
    fn second_decision_on_same_day_is_rejected() {
        let processor = DecisionProcessor::new(RewardsConfig::default());
        let mut state = state_with_pending(2, Ledger::default());
        processor
            .apply(&mut state, DayId(2), Decision::Completed, &fixed)
            .unwrap();
        assert!(processor
            .apply(&mut state, DayId(2), Decision::Missed, &fixed)
            .is_err());
        assert_eq!(state.ledger, Ledger::new(500, 1));
    }
}
