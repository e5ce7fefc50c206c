//! Shared nutrient totals
//!
//! Used for per-unit food values, single consumptions, and day totals.

use serde::{Deserialize, Serialize};

/// Calories (kcal) and protein (g)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
}

impl Nutrients {
    pub fn new(calories: f64, protein: f64) -> Self {
        Self { calories, protein }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrient values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
        }
    }

    pub fn add(&self, other: &Nutrients) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
        }
    }
}

impl std::ops::Add for Nutrients {
    type Output = Nutrients;

    fn add(self, other: Nutrients) -> Nutrients {
        Nutrients::add(&self, &other)
    }
}

impl std::ops::AddAssign for Nutrients {
    fn add_assign(&mut self, other: Nutrients) {
        *self = Nutrients::add(self, &other);
    }
}

impl std::ops::Mul<f64> for Nutrients {
    type Output = Nutrients;

    fn mul(self, multiplier: f64) -> Nutrients {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrients {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrients::zero(), |acc, n| acc + n)
    }
}

/// What `quantity` units of a food contribute: `per_unit * quantity`.
///
/// No clamping is applied; quantity validation happens when consumptions
/// are logged.
pub fn nutrient_contribution(per_unit: Nutrients, quantity: f64) -> Nutrients {
    per_unit.scale(quantity)
}
