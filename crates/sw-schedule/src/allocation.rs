//! Thief-quota allocation across a day's waves.
//!
//! Each unit of the quota goes to a wave drawn uniformly from the waves still
//! under the cap, not round-robin: for a quota of 5 over four waves any
//! arrangement of `2,1,1,1` can come out.

use sw_core::SimRng;
use tracing::warn;

/// Per-wave thief counts for one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// `per_wave[i]` thieves go to wave `i + 1`.
    pub per_wave: Vec<u32>,
    /// Quota units that did not fit under the cap.
    pub dropped:  u32,
}

impl Allocation {
    /// Thieves actually assigned.
    pub fn total(&self) -> u32 {
        self.per_wave.iter().sum()
    }

    /// Quota for 1-based wave `number`; 0 outside the day.
    pub fn for_wave(&self, number: u8) -> u32 {
        (number as usize)
            .checked_sub(1)
            .and_then(|i| self.per_wave.get(i))
            .copied()
            .unwrap_or(0)
    }
}

/// Split `quota` across `waves` waves with at most `cap` thieves each.
///
/// Quota beyond `cap * waves` is dropped with a warning; the result always
/// sums to `min(quota, cap * waves)`.
pub fn allocate_thieves(quota: u32, waves: u32, cap: u32, rng: &mut SimRng) -> Allocation {
    let mut per_wave = vec![0u32; waves as usize];
    let mut open: Vec<usize> = if cap > 0 { (0..per_wave.len()).collect() } else { Vec::new() };
    let mut dropped = 0;

    for assigned in 0..quota {
        if open.is_empty() {
            dropped = quota - assigned;
            break;
        }
        let slot = rng.gen_range(0..open.len());
        let wave = open[slot];
        per_wave[wave] += 1;
        if per_wave[wave] >= cap {
            open.swap_remove(slot);
        }
    }

    if dropped > 0 {
        warn!(quota, waves, cap, dropped, "thief quota exceeds wave capacity; excess dropped");
    }
    Allocation { per_wave, dropped }
}
