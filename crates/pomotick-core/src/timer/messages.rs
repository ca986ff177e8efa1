//! Motivational message pools, one per category.
//!
//! Selection goes through [`MessagePicker`], which wraps a PCG generator so
//! tests (and users who set `messages.seed`) get a reproducible sequence.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use super::mode::Category;

pub const WORK_MESSAGES: [&str; 10] = [
    "Stay focused, you're doing great!",
    "One task at a time.",
    "Deep work builds momentum.",
    "Progress over perfection.",
    "Keep going, the break will come.",
    "Small steps add up to big results.",
    "Silence the noise and build something.",
    "You've got this. Stay in the zone.",
    "Finish this block strong.",
    "Focus is a muscle. Flex it.",
];

pub const REST_MESSAGES: [&str; 10] = [
    "Take a deep breath and relax.",
    "Stretch your arms and shoulders.",
    "Grab a glass of water.",
    "Look away from the screen for a moment.",
    "Rest is part of the work.",
    "Stand up and walk around a little.",
    "Let your mind wander.",
    "Roll your neck and unclench your jaw.",
    "Enjoy the pause. You earned it.",
    "Recharge now, focus better later.",
];

pub fn pool(category: Category) -> &'static [&'static str] {
    match category {
        Category::Work => &WORK_MESSAGES,
        Category::Rest => &REST_MESSAGES,
    }
}

/// Uniformly pick one message from the category's pool.
pub fn select_random_message<R: Rng + ?Sized>(rng: &mut R, category: Category) -> &'static str {
    let messages = pool(category);
    messages[rng.gen_range(0..messages.len())]
}

#[derive(Debug, Clone)]
pub struct MessagePicker {
    rng: Mcg128Xsl64,
}

impl MessagePicker {
    /// Picker seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Picker with a fixed seed; the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = Mcg128Xsl64::seed_from_u64(seed);
    }

    pub fn select(&mut self, category: Category) -> &'static str {
        select_random_message(&mut self.rng, category)
    }
}

impl Default for MessagePicker {
    fn default() -> Self {
        Self::new()
    }
}
