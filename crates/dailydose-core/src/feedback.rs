//! Feedback phrases shown after a decision.

use std::cell::RefCell;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::decision::Decision;

/// Picks the note attached to a decided day.
pub trait FeedbackProvider {
    fn phrase(&self, decision: Decision, bonus_day: bool) -> String;
}

impl<F> FeedbackProvider for F
where
    F: Fn(Decision, bool) -> String,
{
    fn phrase(&self, decision: Decision, bonus_day: bool) -> String {
        self(decision, bonus_day)
    }
}

const TAKEN_PHRASES: &[&str] = &[
    "Well done, little cucumber 🥒",
    "Beaver approves 🦫",
    "Rock on 🤘",
    "Absolute machine 🚜",
    "Legend 🏆",
    "Shining brighter than the sun ☀️",
    "Proud of you 🥹",
    "Discipline is your middle name 🧘",
    "The piggy bank says thank you 💰",
    "Health +100 XP 🆙",
    "Keep it up ✊",
    "One more step toward the goal 🐾",
    "Flawless 👌",
    "Queen of the routine 👑",
];

const MISSED_PHRASES: &[&str] = &[
    "Not great 👎",
    "Health has left the chat 👋",
    "Press F 🫡",
    "Same rake, again 🧹",
    "The piggy bank is crying 😿",
    "Minus morale, minus money 💸",
    "Tomorrow will be better? 🤔",
    "Penalty kick ⚽",
    "Seriously? Again? 🤨",
    "I'm watching you 👀",
    "Money down the drain 🌬️",
    "Sad trombone 🎺",
];

const BONUS_PHRASE: &str = "WOW! Super prize day! You are incredible! 🤑🎉";

/// Random phrases from fixed positive/negative pools.
#[derive(Debug)]
pub struct PhrasePool {
    taken: Vec<String>,
    missed: Vec<String>,
    bonus: String,
    rng: RefCell<Pcg64>,
}

impl PhrasePool {
    /// Built-in pools with a randomly seeded generator.
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// Built-in pools with a fixed seed, for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self::with_pools(
            TAKEN_PHRASES.iter().map(|s| s.to_string()).collect(),
            MISSED_PHRASES.iter().map(|s| s.to_string()).collect(),
            BONUS_PHRASE,
            seed,
        )
    }

    pub fn with_pools(
        taken: Vec<String>,
        missed: Vec<String>,
        bonus: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self {
            taken,
            missed,
            bonus: bonus.into(),
            rng: RefCell::new(Pcg64::seed_from_u64(seed)),
        }
    }

    fn pick(&self, pool: &[String], fallback: &str) -> String {
        let mut rng = self.rng.borrow_mut();
        pool.choose(&mut *rng)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl Default for PhrasePool {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackProvider for PhrasePool {
    fn phrase(&self, decision: Decision, bonus_day: bool) -> String {
        match decision {
            Decision::Completed if bonus_day => self.bonus.clone(),
            Decision::Completed => self.pick(&self.taken, "Done"),
            Decision::Missed => self.pick(&self.missed, "Missed"),
        }
    }
}
