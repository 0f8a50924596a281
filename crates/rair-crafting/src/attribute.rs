//! Numeric item attributes.
//!
//! Every attribute is owned by exactly one [`Item`](crate::item::Item).
//! Attributes are plain values: cloning an item copies them, so two items can
//! never share an attribute instance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Common surface of item attributes.
pub trait Attribute: fmt::Debug {
    /// Attribute name used in reports.
    fn name(&self) -> &'static str;

    /// Whether the attribute is shown to the player.
    fn exposed(&self) -> bool;

    /// Short human-readable value.
    fn summary(&self) -> String;
}

/// Wear of an item, bounded to `[0, max_value]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Durability {
    value: f32,
    max_value: f32,
}

impl Durability {
    /// Creates a durability at full value.
    #[must_use]
    pub fn new(max_value: f32) -> Self {
        let max_value = max_value.max(0.0);
        Self {
            value: max_value,
            max_value,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Upper bound of the value.
    #[must_use]
    pub const fn max_value(&self) -> f32 {
        self.max_value
    }

    /// Sets the value, clamped to `[0, max_value]`.
    pub fn set_value(&mut self, value: f32) {
        self.value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, self.max_value)
        };
    }

    /// Sets the upper bound. The current value is pulled down if it exceeds it.
    pub fn set_max_value(&mut self, max_value: f32) {
        self.max_value = max_value.max(0.0);
        self.value = self.value.min(self.max_value);
    }

    /// `value / max_value`, or zero for an item without any durability.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max_value > 0.0 {
            self.value / self.max_value
        } else {
            0.0
        }
    }

    /// Sets the value to `max_value * ratio`.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.set_value(self.max_value * ratio);
    }

    /// Changes the upper bound while keeping the relative wear.
    pub fn rescale(&mut self, max_value: f32) {
        let ratio = self.ratio();
        self.set_max_value(max_value);
        self.set_ratio(ratio);
    }

    /// Subtracts wear, never going below zero.
    pub fn wear(&mut self, amount: f32) {
        self.set_value(self.value - amount);
    }

    /// True once the value reached zero.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.value <= 0.0
    }
}

impl Attribute for Durability {
    fn name(&self) -> &'static str {
        "Durability"
    }

    fn exposed(&self) -> bool {
        true
    }

    fn summary(&self) -> String {
        format!("{:.0}/{:.0}", self.value, self.max_value)
    }
}

/// Remaining number of times an item may be used as a crafting input.
///
/// Not clamped: consumers decrement explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecipeCount {
    /// Remaining uses.
    pub value: i32,
}

impl RecipeCount {
    /// Creates a recipe count.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self { value }
    }

    /// Sets the count from a float, truncating toward zero.
    pub fn set_from_f32(&mut self, value: f32) {
        self.value = value as i32;
    }

    /// Uses up one crafting pass.
    pub fn consume(&mut self) {
        self.value -= 1;
    }
}

impl Attribute for RecipeCount {
    fn name(&self) -> &'static str {
        "Recipe count"
    }

    fn exposed(&self) -> bool {
        true
    }

    fn summary(&self) -> String {
        self.value.to_string()
    }
}

/// Food energy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Calorie {
    /// Energy value.
    pub value: f32,
}

impl Calorie {
    /// Values at or below this are treated as "no calorie data".
    pub const EXPOSURE_THRESHOLD: f32 = 0.01;
}

impl Attribute for Calorie {
    fn name(&self) -> &'static str {
        "Calorie"
    }

    fn exposed(&self) -> bool {
        self.value > Self::EXPOSURE_THRESHOLD
    }

    fn summary(&self) -> String {
        format!("{:.1}", self.value)
    }
}

/// How much fuel an item provides when burnt.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Combustibility {
    /// Fuel value.
    pub value: f32,
}

impl Combustibility {
    /// Spends fuel. The value may go negative; callers gate on it beforehand.
    pub fn burn(&mut self, amount: f32) {
        self.value -= amount;
    }
}

impl Attribute for Combustibility {
    fn name(&self) -> &'static str {
        "Combustibility"
    }

    fn exposed(&self) -> bool {
        false
    }

    fn summary(&self) -> String {
        format!("{:.0}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durability_clamps() {
        let mut durability = Durability::new(40.0);
        durability.set_value(55.0);
        assert_eq!(durability.value(), 40.0);

        durability.set_value(-3.0);
        assert_eq!(durability.value(), 0.0);
        assert!(durability.is_broken());

        durability.set_value(f32::NAN);
        assert_eq!(durability.value(), 0.0);
    }

    #[test]
    fn test_durability_ratio() {
        let mut durability = Durability::new(40.0);
        durability.set_value(10.0);
        assert_eq!(durability.ratio(), 0.25);

        durability.set_ratio(0.5);
        assert_eq!(durability.value(), 20.0);
    }

    #[test]
    fn test_durability_rescale_keeps_wear() {
        let mut durability = Durability::new(40.0);
        durability.set_value(30.0);
        durability.rescale(20.0);
        assert_eq!(durability.max_value(), 20.0);
        assert_eq!(durability.value(), 15.0);
    }

    #[test]
    fn test_zero_max_ratio() {
        let durability = Durability::new(0.0);
        assert_eq!(durability.ratio(), 0.0);
    }

    #[test]
    fn test_recipe_count_truncates() {
        let mut count = RecipeCount::new(2);
        count.set_from_f32(3.9);
        assert_eq!(count.value, 3);
        count.consume();
        assert_eq!(count.value, 2);
    }

    #[test]
    fn test_exposure() {
        assert!(Durability::new(1.0).exposed());
        assert!(!Calorie { value: 0.005 }.exposed());
        assert!(Calorie { value: 3.0 }.exposed());
        assert!(!Combustibility { value: 100.0 }.exposed());
    }
}
