//! Recipe catalog tuning.
//!
//! Every number the catalog recipes use lives here: experience grants, tool
//! wear, fuel cost, multipliers and roll thresholds. The defaults reproduce
//! the stock recipes. Tuning can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use rair_common::{RairError, RairResult};

/// Tuning file name looked up in the working directory.
pub const CONFIG_FILE: &str = "rair.toml";

/// Grill tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrillConfig {
    /// Subtracted from the maximum durability of the result
    pub durability_loss: f32,
    /// Calorie multiplier
    pub calorie_multiplier: f32,
    /// Combustibility the fuel item must have and loses
    pub fuel_cost: f32,
    /// Tool durability lost per run
    pub tool_wear: f32,
    /// Cooking experience granted
    pub exp: f32,
    /// Chance of a second Cooked level, scaled by the Cooking level rate
    pub cooked_bonus_weight: f32,
}

impl Default for GrillConfig {
    fn default() -> Self {
        Self {
            durability_loss: 10.0,
            calorie_multiplier: 2.5,
            fuel_cost: 100.0,
            tool_wear: 2.0,
            exp: 15.0,
            cooked_bonus_weight: 1.0,
        }
    }
}

/// Grind tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrindConfig {
    /// Most raw-food inputs per run
    pub max_inputs: usize,
    /// Maximum durability multiplier
    pub durability_multiplier: f32,
    /// Durability lost by mortar and pestle each
    pub tool_wear: f32,
    /// Cooking experience granted
    pub exp: f32,
}

impl Default for GrindConfig {
    fn default() -> Self {
        Self {
            max_inputs: 10,
            durability_multiplier: 1.2,
            tool_wear: 1.0,
            exp: 1.0,
        }
    }
}

/// Knead tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KneadConfig {
    /// Most flour inputs per run
    pub max_flour: usize,
    /// Result max durability as a fraction of the mean flour durability
    pub durability_factor: f32,
    /// Cooking experience granted
    pub exp: f32,
}

impl Default for KneadConfig {
    fn default() -> Self {
        Self {
            max_flour: 5,
            durability_factor: 0.7,
            exp: 2.0,
        }
    }
}

/// Weave tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// Exact number of fiber inputs
    pub fiber_count: usize,
    /// Added to the mean recipe count before truncation
    pub recipe_count_bonus: f32,
    /// Needle durability lost per run
    pub tool_wear: f32,
    /// Dexterity experience granted
    pub exp: f32,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            fiber_count: 5,
            recipe_count_bonus: 1.0,
            tool_wear: 2.0,
            exp: 10.0,
        }
    }
}

/// Smoke tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Installation the smoke comes from
    pub station: String,
    /// Installation fuel needed and spent
    pub fuel_cost: f32,
    /// Maximum durability multiplier
    pub durability_multiplier: f32,
    /// Cooking experience granted
    pub exp: f32,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            station: "Fire pit".to_string(),
            fuel_cost: 50.0,
            durability_multiplier: 1.5,
            exp: 5.0,
        }
    }
}

/// Temper roll thresholds, checked from the highest down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperConfig {
    /// Above this: "Very hard", Hardness +2
    pub very_hard: f32,
    /// Above this: "Hard", Hardness +1
    pub hard: f32,
    /// Above this: "Sharp", Sharpness +1
    pub sharp: f32,
}

impl Default for TemperConfig {
    fn default() -> Self {
        Self {
            very_hard: 0.75,
            hard: 0.5,
            sharp: 0.25,
        }
    }
}

/// Tuning of every catalog recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Grill
    pub grill: GrillConfig,
    /// Grind
    pub grind: GrindConfig,
    /// Knead
    pub knead: KneadConfig,
    /// Weave
    pub weave: WeaveConfig,
    /// Smoke
    pub smoke: SmokeConfig,
    /// Temper
    pub temper: TemperConfig,
}

impl CatalogConfig {
    /// Parses and validates tuning.
    pub fn parse(contents: &str) -> RairResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads tuning from [`CONFIG_FILE`] in the working directory.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads tuning from `path`.
    /// Returns the defaults if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Tuning file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read tuning file: {e}");
                return Self::default();
            },
        };

        match Self::parse(&contents) {
            Ok(config) => {
                info!("Loaded tuning from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Ignoring tuning file {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Saves tuning to `path`.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> RairResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved tuning to {}", path.display());
        Ok(())
    }

    /// Rejects values no recipe can work with.
    pub fn validate(&self) -> RairResult<()> {
        let non_negative = [
            ("grill.durability_loss", self.grill.durability_loss),
            ("grill.calorie_multiplier", self.grill.calorie_multiplier),
            ("grill.fuel_cost", self.grill.fuel_cost),
            ("grill.tool_wear", self.grill.tool_wear),
            ("grill.exp", self.grill.exp),
            ("grill.cooked_bonus_weight", self.grill.cooked_bonus_weight),
            ("grind.durability_multiplier", self.grind.durability_multiplier),
            ("grind.tool_wear", self.grind.tool_wear),
            ("grind.exp", self.grind.exp),
            ("knead.durability_factor", self.knead.durability_factor),
            ("knead.exp", self.knead.exp),
            ("weave.recipe_count_bonus", self.weave.recipe_count_bonus),
            ("weave.tool_wear", self.weave.tool_wear),
            ("weave.exp", self.weave.exp),
            ("smoke.fuel_cost", self.smoke.fuel_cost),
            ("smoke.durability_multiplier", self.smoke.durability_multiplier),
            ("smoke.exp", self.smoke.exp),
        ];
        for (key, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(RairError::InvalidConfig(format!(
                    "{key} must not be negative, got {value}"
                )));
            }
        }

        let counts = [
            ("grind.max_inputs", self.grind.max_inputs),
            ("knead.max_flour", self.knead.max_flour),
            ("weave.fiber_count", self.weave.fiber_count),
        ];
        for (key, value) in counts {
            if value == 0 {
                return Err(RairError::InvalidConfig(format!("{key} must be at least 1")));
            }
        }

        let t = &self.temper;
        if t.very_hard < t.hard || t.hard < t.sharp {
            return Err(RairError::InvalidConfig(
                "temper thresholds must descend: very_hard >= hard >= sharp".to_string(),
            ));
        }

        if self.smoke.station.is_empty() {
            return Err(RairError::InvalidConfig("smoke.station must be named".to_string()));
        }
        Ok(())
    }
}
