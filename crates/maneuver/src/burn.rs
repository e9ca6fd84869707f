//! Delta-v vectors in the orbital velocity frame.

use serde::{Deserialize, Serialize};

/// Burn axis relative to the orbital velocity frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Radial,
    Normal,
    Prograde,
}

/// Sign of a single increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn signum(self) -> f64 {
        match self {
            Self::Plus => 1.0,
            Self::Minus => -1.0,
        }
    }
}

/// Delta-v (m/s) split into radial, normal and prograde components. Any value is accepted; the
/// host decides what the vessel can actually fly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BurnVector {
    pub radial: f64,
    pub normal: f64,
    pub prograde: f64,
}

impl BurnVector {
    pub fn new(radial: f64, normal: f64, prograde: f64) -> Self {
        Self {
            radial,
            normal,
            prograde,
        }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Radial => self.radial,
            Axis::Normal => self.normal,
            Axis::Prograde => self.prograde,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        *self.component_mut(axis) = value;
    }

    pub fn add(&mut self, axis: Axis, delta: f64) {
        *self.component_mut(axis) += delta;
    }

    pub fn zero(&mut self, axis: Axis) {
        self.set(axis, 0.0);
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.radial * self.radial + self.normal * self.normal + self.prograde * self.prograde
    }

    /// Pin this vector to an instant.
    pub fn at(self, ut: f64) -> Burn {
        Burn { delta_v: self, ut }
    }

    fn component_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Radial => &mut self.radial,
            Axis::Normal => &mut self.normal,
            Axis::Prograde => &mut self.prograde,
        }
    }
}

/// Persisted form of a burn: `(radial, normal, prograde, ut)`.
pub type BurnRecord = (f64, f64, f64, f64);

/// A delta-v vector scheduled at an absolute UT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BurnRecord", into = "BurnRecord")]
pub struct Burn {
    pub delta_v: BurnVector,
    pub ut: f64,
}

impl Burn {
    pub fn new(delta_v: BurnVector, ut: f64) -> Self {
        Self { delta_v, ut }
    }

    pub fn magnitude(&self) -> f64 {
        self.delta_v.magnitude()
    }
}

impl From<BurnRecord> for Burn {
    fn from((radial, normal, prograde, ut): BurnRecord) -> Self {
        BurnVector::new(radial, normal, prograde).at(ut)
    }
}

impl From<Burn> for BurnRecord {
    fn from(burn: Burn) -> Self {
        let v = burn.delta_v;
        (v.radial, v.normal, v.prograde, burn.ut)
    }
}
