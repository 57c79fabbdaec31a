//! Seeded random streams for customers and for the session loop.
//!
//! A customer's stream depends only on the session seed and its
//! [`AgentId`]: ids are never reused, so replaying a seed with the same
//! operator input repeats every checkpoint pick and warning budget, whatever
//! order (or thread) the controllers are stepped in.
//!
//! Scheduler work (thief allocation, spawn shuffles, template picks) draws
//! from a [`SimRng`], with one child stream per day.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand::distributions::uniform::{SampleRange, SampleUniform};

use crate::AgentId;

/// Golden-ratio multiplier; spreads neighbouring salts across the seed space.
const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

fn mixed(seed: u64, salt: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ salt.wrapping_mul(GOLDEN))
}

/// A customer's private stream, owned by its controller.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(session_seed: u64, agent: AgentId) -> Self {
        AgentRng(mixed(session_seed, u64::from(agent.0)))
    }

    /// Uniform draw from `range`.
    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }
}

/// Stream for the serialized session loop.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream, e.g. for one day's scheduler.
    /// Advances `self`.
    pub fn child(&mut self, salt: u64) -> SimRng {
        let seed: u64 = self.0.r#gen();
        SimRng(mixed(seed, salt))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Uniform permutation in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }

    /// `None` on an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}
