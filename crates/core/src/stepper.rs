//! Granularity-tiered relative time adjustment shared by the maneuver planner and warp editor.

use crate::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SECONDS_PER_YEAR};

/// Time step tier, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Granularity {
    /// Hundredths of a second up to ten seconds.
    Fine,
    /// One minute up to one day.
    #[default]
    Medium,
    /// Ten days up to ten years.
    Coarse,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Fine, Granularity::Medium, Granularity::Coarse];

    /// Tier position in `[0, 2]`.
    pub fn index(self) -> usize {
        match self {
            Self::Fine => 0,
            Self::Medium => 1,
            Self::Coarse => 2,
        }
    }

    /// Tier at `index`, clamped into `[0, 2]`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// The four step sizes of this tier in seconds, smallest first.
    pub fn increments(self) -> [f64; 4] {
        match self {
            Self::Fine => [0.01, 0.1, 1.0, 10.0],
            Self::Medium => [
                SECONDS_PER_MINUTE,
                10.0 * SECONDS_PER_MINUTE,
                SECONDS_PER_HOUR,
                SECONDS_PER_DAY,
            ],
            Self::Coarse => [
                10.0 * SECONDS_PER_DAY,
                100.0 * SECONDS_PER_DAY,
                SECONDS_PER_YEAR,
                10.0 * SECONDS_PER_YEAR,
            ],
        }
    }

    /// Step size in seconds for `magnitude` within this tier.
    pub fn increment(self, magnitude: StepMagnitude) -> f64 {
        self.increments()[magnitude.index()]
    }
}

/// Which of a tier's four step sizes to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepMagnitude {
    Smallest,
    Small,
    Large,
    Largest,
}

impl StepMagnitude {
    pub const ALL: [StepMagnitude; 4] = [
        StepMagnitude::Smallest,
        StepMagnitude::Small,
        StepMagnitude::Large,
        StepMagnitude::Largest,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Smallest => 0,
            Self::Small => 1,
            Self::Large => 2,
            Self::Largest => 3,
        }
    }
}

/// Step direction along the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn signum(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Apply one step to `ut`. Forward and backward steps of the same tier and magnitude cancel.
pub fn apply_step(ut: f64, tier: Granularity, direction: Direction, magnitude: StepMagnitude) -> f64 {
    ut + direction.signum() * tier.increment(magnitude)
}

/// Current tier selection; the only state a time panel keeps between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeStepper {
    tier: Granularity,
}

impl TimeStepper {
    pub fn new(tier: Granularity) -> Self {
        Self { tier }
    }

    pub fn tier(&self) -> Granularity {
        self.tier
    }

    /// Move one tier towards larger steps, stopping at [`Granularity::Coarse`].
    pub fn coarser(&mut self) -> Granularity {
        self.tier = Granularity::from_index(self.tier.index() + 1);
        self.tier
    }

    /// Move one tier towards smaller steps, stopping at [`Granularity::Fine`].
    pub fn finer(&mut self) -> Granularity {
        self.tier = Granularity::from_index(self.tier.index().saturating_sub(1));
        self.tier
    }

    /// Apply a step of the current tier.
    pub fn step(&self, ut: f64, direction: Direction, magnitude: StepMagnitude) -> f64 {
        apply_step(ut, self.tier, direction, magnitude)
    }
}
