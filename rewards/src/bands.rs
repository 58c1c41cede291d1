//! Reward bands and the band-crossing token math.

use crate::error::RewardError;
use serde::{Deserialize, Serialize};

/// One reward band: cumulative volume in `[min, max)` earns `rate` tokens
/// per currency unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBand {
    pub min: u128,
    pub max: u128,
    pub rate: u128,
}

impl RewardBand {
    pub fn new(min: u128, max: u128, rate: u128) -> Self {
        Self { min, max, rate }
    }

    pub fn contains(&self, value: u128) -> bool {
        self.min <= value && value < self.max
    }
}

/// A validated, ordered list of reward bands.
///
/// Construction enforces the schedule invariants once, so the math below
/// never re-checks them: bands start at zero, tile the whole cumulative
/// axis without gaps or overlaps, rates never increase, and the final band
/// is open-ended (`max == u128::MAX`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSchedule {
    bands: Vec<RewardBand>,
}

impl BandSchedule {
    pub fn new(bands: Vec<RewardBand>) -> Result<Self, RewardError> {
        if bands.is_empty() {
            return Err(RewardError::EmptySchedule);
        }
        if bands[0].min != 0 {
            return Err(RewardError::FirstBandNotZero);
        }
        for (i, band) in bands.iter().enumerate() {
            if band.max <= band.min {
                return Err(RewardError::EmptyBand(i));
            }
            if i > 0 {
                if band.min != bands[i - 1].max {
                    return Err(RewardError::Discontiguous(i));
                }
                if band.rate > bands[i - 1].rate {
                    return Err(RewardError::RateIncreases(i));
                }
            }
        }
        if bands[bands.len() - 1].max != u128::MAX {
            return Err(RewardError::LastBandClosed);
        }
        Ok(Self { bands })
    }

    /// The launch schedule: rates halve-ish as platform volume grows.
    pub fn tribunal_defaults() -> Self {
        Self::new(vec![
            RewardBand::new(0, 100_000, 300),
            RewardBand::new(100_000, 500_000, 150),
            RewardBand::new(500_000, 2_000_000, 75),
            RewardBand::new(2_000_000, 10_000_000, 40),
            RewardBand::new(10_000_000, u128::MAX, 20),
        ])
        .expect("default schedule is valid")
    }

    pub fn bands(&self) -> &[RewardBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RewardBand> {
        self.bands.get(index)
    }

    /// Index of the band containing `cumulative`. Values past every
    /// configured range land in the last band; with an open-ended final
    /// band only `u128::MAX` itself takes that path.
    pub fn current_band(&self, cumulative: u128) -> usize {
        self.bands
            .iter()
            .position(|b| b.contains(cumulative))
            .unwrap_or(self.bands.len() - 1)
    }

    /// Tokens earned by moving cumulative volume from `from` to `to`.
    ///
    /// Walks the bands and prices each overlapping slice at that band's
    /// rate, so a payment straddling a boundary is split across the two
    /// rates instead of taking either one for the whole amount. Additive:
    /// `tokens_for_range(a, c) == tokens_for_range(a, b) +
    /// tokens_for_range(b, c)` for any `a <= b <= c`.
    pub fn tokens_for_range(&self, from: u128, to: u128) -> Result<u128, RewardError> {
        if from > to {
            return Err(RewardError::InvalidRange { from, to });
        }
        let mut total = 0u128;
        for band in &self.bands {
            let lo = from.max(band.min);
            let hi = to.min(band.max);
            if lo < hi {
                let tokens = (hi - lo)
                    .checked_mul(band.rate)
                    .ok_or(RewardError::Overflow)?;
                total = total.checked_add(tokens).ok_or(RewardError::Overflow)?;
            }
        }
        Ok(total)
    }
}
