//! Shuffle selection
//!
//! Picks the next playlist index uniformly at random, skipping the current
//! track and everything already played in the current cycle. When the cycle
//! is exhausted the caller is told to start a new one.

use crate::history::History;
use rand::seq::SliceRandom;
use rand::Rng;

/// Result of a shuffle draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShufflePick {
    /// Index to move to
    pub index: usize,

    /// Every other track was already played; history must be reset
    pub cycle_completed: bool,
}

/// Choose the next index for a playlist of `len` tracks
///
/// `history` holds the indices played in the current cycle. With a single
/// track the current index is returned unchanged.
pub fn pick_next<R: Rng + ?Sized>(
    current: usize,
    len: usize,
    history: &History,
    rng: &mut R,
) -> ShufflePick {
    if len <= 1 {
        return ShufflePick {
            index: current,
            cycle_completed: false,
        };
    }

    let fresh: Vec<usize> = (0..len)
        .filter(|&index| index != current && !history.contains(index))
        .collect();

    if let Some(&index) = fresh.choose(rng) {
        return ShufflePick {
            index,
            cycle_completed: false,
        };
    }

    // Full cycle: anything but the current track
    let others: Vec<usize> = (0..len).filter(|&index| index != current).collect();
    let index = others.choose(rng).copied().unwrap_or(current);

    ShufflePick {
        index,
        cycle_completed: true,
    }
}
