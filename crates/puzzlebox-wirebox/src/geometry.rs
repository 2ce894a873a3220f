//! Fixed-point 3D geometry for the wire chain.
//!
//! All positions and thresholds are Q32.32 so chain-extension decisions are
//! deterministic across platforms. Distance comparisons use squared
//! magnitudes; the square root is only computed when a segment is frozen
//! to its exact final length.

use puzzlebox_core::fixed::Fixed64;
use serde::{Deserialize, Serialize};

/// A point or direction in puzzle-local space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: Fixed64,
    pub y: Fixed64,
    pub z: Fixed64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
        z: Fixed64::ZERO,
    };

    pub fn new(x: Fixed64, y: Fixed64, z: Fixed64) -> Self {
        Self { x, y, z }
    }

    /// Construct from f64 components. Data-loading boundary only.
    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Fixed64::from_num(x),
            y: Fixed64::from_num(y),
            z: Fixed64::from_num(z),
        }
    }

    pub fn length_squared(&self) -> Fixed64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> Fixed64 {
        sqrt(self.length_squared())
    }

    /// Squared distance to another point.
    pub fn distance_squared(&self, other: &Vec3) -> Fixed64 {
        (*self - *other).length_squared()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Fixed-point square root via Newton-Raphson. Deterministic: the iteration
/// count is bounded and the result depends only on the input bits.
pub fn sqrt(v: Fixed64) -> Fixed64 {
    if v <= Fixed64::ZERO {
        return Fixed64::ZERO;
    }
    let half = Fixed64::from_num(0.5);
    let mut guess = if v > Fixed64::ONE { v } else { Fixed64::ONE };
    for _ in 0..48 {
        let next = half * (guess + v / guess);
        if next == guess {
            break;
        }
        guess = next;
    }
    guess
}
