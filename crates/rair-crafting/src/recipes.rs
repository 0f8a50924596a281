//! The stock recipe catalog.
//!
//! Each function builds one fully-wired [`Recipe`] from its tuning section.
//! [`RecipeBook`] keeps them by name.

use fastrand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{
    CatalogConfig, GrillConfig, GrindConfig, KneadConfig, SmokeConfig, TemperConfig, WeaveConfig,
};
use crate::crafter::Crafter;
use crate::error::{CraftingError, CraftingResult};
use crate::installation::Installation;
use crate::item::{Item, ItemKind};
use crate::recipe::Recipe;
use crate::requirement::{InstallationRequirement, ItemRequirement, SkillRequirement, ToolRequirement};
use crate::selection::{mean, pick};
use crate::skill::{cooking, dexterity, Skill, SkillKind};
use crate::tag::{catalog, Tag};

/// Name of the Grill recipe.
pub const GRILL: &str = "Grill";
/// Name of the Grind recipe.
pub const GRIND: &str = "Grind";
/// Name of the Knead recipe.
pub const KNEAD: &str = "Knead";
/// Name of the Weave recipe.
pub const WEAVE: &str = "Weave";
/// Name of the Smoke recipe.
pub const SMOKE: &str = "Smoke";
/// Name of the Temper recipe.
pub const TEMPER: &str = "Temper";

fn skill_of(crafter: &mut dyn Crafter, kind: SkillKind) -> CraftingResult<&mut Skill> {
    crafter.skill_mut(kind).ok_or(CraftingError::MissingSkill(kind))
}

fn train(crafter: &mut dyn Crafter, kind: SkillKind, exp: f32) -> CraftingResult<()> {
    if let Some(level) = skill_of(crafter, kind)?.add_exp(exp) {
        debug!("{kind} reached level {level}");
    }
    Ok(())
}

fn empty(recipe: &Recipe, requirement: &str) -> CraftingError {
    CraftingError::MissingInput {
        recipe: recipe.label().to_string(),
        requirement: requirement.to_string(),
    }
}

fn has_durability(wear: f32) -> impl Fn(&Item) -> bool + Send + Sync + 'static {
    move |item: &Item| item.durability.value() >= wear
}

// ============================================================================
// Cooking
// ============================================================================

/// Grill: roasts one raw ingredient over a fuel item.
///
/// The result loses maximum durability at the same wear ratio, gains
/// calories, spends one recipe count and gets a Cooked level. A skilled cook
/// occasionally adds a second level.
#[must_use]
pub fn grill(config: &GrillConfig) -> Recipe {
    let c = config.clone();
    let fuel_cost = c.fuel_cost;
    let tool_wear = c.tool_wear;

    Recipe::builder(GRILL)
        .description("Briefly roast an ingredient over a fire.")
        .requirement(
            ItemRequirement::new("Ingredient")
                .condition("Raw food", |i: &Item| i.has(&catalog::RAW_FOOD))
                .condition("Recipe count 1+", |i: &Item| i.recipe_count.value >= 1),
        )
        .requirement(
            ItemRequirement::new("Fuel")
                .condition("Fuel", |i: &Item| i.has(&catalog::FUEL))
                .condition(format!("Combustibility {fuel_cost:.0}+"), move |i: &Item| {
                    i.combustibility.value >= fuel_cost
                }),
        )
        .requirement(
            ToolRequirement::new("Tool")
                .condition("Tool", |i: &Item| i.has(&catalog::TOOL))
                .condition(format!("Durability {tool_wear:.0}+"), has_durability(tool_wear)),
        )
        .requirement(
            SkillRequirement::new("Cooking", SkillKind::Cooking)
                .condition("Level 1+", |s: &Skill| s.level() >= 1)
                .condition("Grill", |s: &Skill| s.acquired(cooking::GRILL)),
        )
        .behavior(move |recipe, crafter, rng| {
            let mut food = recipe.take_item(0)?;
            let mut fuel = recipe.take_item(1)?;
            let mut tool = recipe.take_tool(0)?;

            let skill = skill_of(crafter, SkillKind::Cooking)?;
            let cooked = if rng.f32() < skill.level_rate() * c.cooked_bonus_weight {
                2
            } else {
                1
            };
            skill.add_exp(c.exp);

            let max = food.durability.max_value() - c.durability_loss;
            food.durability.rescale(max);
            food.calorie.value *= c.calorie_multiplier;
            food.recipe_count.consume();
            food.remove_tag(&catalog::RAW_FOOD);
            food.add_tag(catalog::COOKED.at(cooked));
            food.rename("Grilled ", "");
            food.kind = ItemKind::Food;

            fuel.combustibility.burn(c.fuel_cost);
            tool.durability.wear(c.tool_wear);

            crafter.add_item(food);
            crafter.add_item(fuel);
            crafter.add_item(tool);
            Ok(())
        })
        .build()
}

/// Grind: mills up to `max_inputs` raw ingredients into one flour.
///
/// The flour is a randomly chosen input with a larger maximum durability
/// and the mean wear ratio of all inputs. One item tagged both Mortar and
/// Pestle fills both tool requirements and wears twice.
#[must_use]
pub fn grind(config: &GrindConfig) -> Recipe {
    let c = config.clone();
    let tool_wear = c.tool_wear;

    Recipe::builder(GRIND)
        .description("Mill dry ingredients into fine grains.")
        .requirement(
            ItemRequirement::new("Raw food")
                .max_count(c.max_inputs)
                .condition("Raw food", |i: &Item| i.has(&catalog::RAW_FOOD)),
        )
        .requirement(
            ToolRequirement::new("Mortar")
                .condition("Mortar", |i: &Item| i.has(&catalog::MORTAR))
                .condition(format!("Durability {tool_wear:.0}+"), has_durability(tool_wear)),
        )
        .requirement(
            ToolRequirement::new("Pestle")
                .condition("Pestle", |i: &Item| i.has(&catalog::PESTLE))
                .condition(format!("Durability {tool_wear:.0}+"), has_durability(tool_wear)),
        )
        .requirement(
            SkillRequirement::new("Cooking", SkillKind::Cooking)
                .condition("Grind", |s: &Skill| s.acquired(cooking::GRIND)),
        )
        .behavior(move |recipe, crafter, rng| {
            let inputs = recipe.take_items(0)?;
            let tools = recipe.take_tools();
            if tools.is_empty() {
                return Err(empty(recipe, "Mortar"));
            }

            let ratio = mean(inputs.iter().map(|i| i.durability.ratio()))
                .ok_or_else(|| empty(recipe, "Raw food"))?;
            let mut flour = pick(rng, &inputs)
                .cloned()
                .ok_or_else(|| empty(recipe, "Raw food"))?;

            let max = flour.durability.max_value() * c.durability_multiplier;
            flour.durability.set_max_value(max);
            flour.durability.set_ratio(ratio);
            flour.swap_tag(&catalog::RAW_FOOD, &catalog::FLOUR);
            flour.rename("", " Flour");

            train(crafter, SkillKind::Cooking, c.exp)?;

            crafter.add_item(flour);
            for (mut tool, uses) in tools {
                tool.durability.wear(c.tool_wear * uses as f32);
                crafter.add_item(tool);
            }
            Ok(())
        })
        .build()
}

/// Knead: mixes flour into a liquid.
///
/// The dough is edible only if every flour and the liquid were.
#[must_use]
pub fn knead(config: &KneadConfig) -> Recipe {
    let c = config.clone();

    Recipe::builder(KNEAD)
        .description("Mix powder into a liquid to form a lump.")
        .requirement(
            ItemRequirement::new("Flour")
                .count(1, c.max_flour)
                .condition("Flour", |i: &Item| i.has(&catalog::FLOUR)),
        )
        .requirement(
            ItemRequirement::new("Liquid").condition("Liquid", |i: &Item| i.has(&catalog::LIQUID)),
        )
        .requirement(
            SkillRequirement::new("Cooking", SkillKind::Cooking)
                .condition("Knead", |s: &Skill| s.acquired(cooking::KNEAD)),
        )
        .behavior(move |recipe, crafter, rng| {
            let flours = recipe.take_items(0)?;
            let liquid = recipe.take_item(1)?;

            let edible = flours.iter().all(|f| f.has(&catalog::EDIBLE)) && liquid.has(&catalog::EDIBLE);
            let durability = mean(flours.iter().map(|f| f.durability.value()))
                .ok_or_else(|| empty(recipe, "Flour"))?;
            let mut dough = pick(rng, &flours)
                .cloned()
                .ok_or_else(|| empty(recipe, "Flour"))?;

            dough.durability.set_max_value(durability * c.durability_factor);
            dough.durability.set_ratio(1.0);
            dough.remove_tags(&[catalog::POWDER, catalog::DUST, catalog::FLOUR]);
            if edible {
                dough.add_tag(catalog::EDIBLE.tag());
            } else {
                dough.remove_tag(&catalog::EDIBLE);
            }
            dough.rename("", " Dough");

            train(crafter, SkillKind::Cooking, c.exp)?;
            crafter.add_item(dough);
            Ok(())
        })
        .build()
}

/// Smoke: preserves a raw ingredient over a fueled installation.
#[must_use]
pub fn smoke(config: &SmokeConfig) -> Recipe {
    let c = config.clone();
    let fuel_cost = c.fuel_cost;

    Recipe::builder(SMOKE)
        .description("Expose food to smoke for flavor and preservation.")
        .requirement(
            ItemRequirement::new("Ingredient")
                .condition("Raw food", |i: &Item| i.has(&catalog::RAW_FOOD)),
        )
        .requirement(
            InstallationRequirement::new("Smoke source", c.station.clone())
                .condition(format!("Fuel {fuel_cost:.0}+"), move |i: &Installation| {
                    i.fuel() >= fuel_cost
                }),
        )
        .requirement(
            SkillRequirement::new("Cooking", SkillKind::Cooking)
                .condition("Level 1+", |s: &Skill| s.level() >= 1)
                .condition("Smoke", |s: &Skill| s.acquired(cooking::SMOKE)),
        )
        .behavior(move |recipe, crafter, _| {
            let station = crafter
                .installation_mut(&c.station)
                .ok_or_else(|| CraftingError::MissingInstallation(c.station.clone()))?;
            if !station.burn(c.fuel_cost) {
                return Err(CraftingError::NotReady {
                    recipe: recipe.label().to_string(),
                    unmet: vec!["Smoke source".to_string()],
                });
            }

            let mut food = recipe.take_item(0)?;
            let max = food.durability.max_value() * c.durability_multiplier;
            food.durability.rescale(max);
            food.remove_tag(&catalog::RAW_FOOD);
            food.rename("Smoked ", "");
            food.kind = ItemKind::Food;

            train(crafter, SkillKind::Cooking, c.exp)?;
            crafter.add_item(food);
            Ok(())
        })
        .build()
}

// ============================================================================
// Handiwork
// ============================================================================

/// Weave: turns fiber into fabric with a needle.
///
/// Maximum durability, wear ratio, recipe count and combustibility are the
/// means of the inputs; the recipe count gains a bonus.
#[must_use]
pub fn weave(config: &WeaveConfig) -> Recipe {
    let c = config.clone();
    let tool_wear = c.tool_wear;

    Recipe::builder(WEAVE)
        .description("Weave fiber into fabric.")
        .requirement(
            ItemRequirement::new("Fiber")
                .count(c.fiber_count, c.fiber_count)
                .condition("Fiber", |i: &Item| i.has(&catalog::FIBER)),
        )
        .requirement(
            ToolRequirement::new("Needle")
                .condition("Needle", |i: &Item| i.has(&catalog::NEEDLE))
                .condition(format!("Durability {tool_wear:.0}+"), has_durability(tool_wear)),
        )
        .requirement(
            SkillRequirement::new("Dexterity", SkillKind::Dexterity)
                .condition("Weave", |s: &Skill| s.acquired(dexterity::WEAVE)),
        )
        .behavior(move |recipe, crafter, rng| {
            let fibers = recipe.take_items(0)?;
            let mut needle = recipe.take_tool(0)?;

            let averages = (
                mean(fibers.iter().map(|f| f.durability.max_value())),
                mean(fibers.iter().map(|f| f.durability.ratio())),
                mean(fibers.iter().map(|f| f.recipe_count.value as f32)),
                mean(fibers.iter().map(|f| f.combustibility.value)),
            );
            let (Some(max), Some(ratio), Some(count), Some(combustibility)) = averages else {
                return Err(empty(recipe, "Fiber"));
            };
            let mut fabric = pick(rng, &fibers)
                .cloned()
                .ok_or_else(|| empty(recipe, "Fiber"))?;

            fabric.durability.set_max_value(max);
            fabric.durability.set_ratio(ratio);
            fabric.recipe_count.set_from_f32(count + c.recipe_count_bonus);
            fabric.combustibility.value = combustibility;
            fabric.swap_tag(&catalog::FIBER, &catalog::FABRIC);
            fabric.rename("", " Fabric");

            needle.durability.wear(c.tool_wear);
            train(crafter, SkillKind::Dexterity, c.exp)?;

            crafter.add_item(fabric);
            crafter.add_item(needle);
            Ok(())
        })
        .build()
}

/// Temper: forges a hard mineral into a blade.
///
/// The blade keeps every tag of the ore and may roll a quality prefix with a
/// Hardness or Sharpness bonus.
#[must_use]
pub fn temper(config: &TemperConfig) -> Recipe {
    let c = config.clone();

    Recipe::builder(TEMPER)
        .description("Forge a hard mineral into a blade.")
        .requirement(
            ItemRequirement::new("Hard ore")
                .condition("Mineral", |i: &Item| i.kind == ItemKind::Mineral)
                .condition("Hardness Lv.1+", |i: &Item| {
                    i.has_tag(&catalog::HARDNESS.at(1))
                }),
        )
        .behavior(move |recipe, crafter, rng| {
            let tags = recipe.all_tags();
            let ore = recipe.take_item(0)?;

            let (prefix, bonus) = temper_roll(&c, rng);
            let mut blade = Item::builder(format!("{prefix}{} Blade", ore.core_name()))
                .core_name(ore.core_name())
                .description("A tempered blade.")
                .kind(ItemKind::Blade)
                .durability(ore.durability.max_value())
                .recipe_count(1)
                .tags(tags)
                .build();
            if let Some(bonus) = bonus {
                blade.add_tag(bonus);
            }

            crafter.add_item(blade);
            Ok(())
        })
        .build()
}

fn temper_roll(c: &TemperConfig, rng: &mut Rng) -> (&'static str, Option<Tag>) {
    match rng.f32() {
        roll if roll > c.very_hard => ("Very hard ", Some(catalog::HARDNESS.at(2))),
        roll if roll > c.hard => ("Hard ", Some(catalog::HARDNESS.at(1))),
        roll if roll > c.sharp => ("Sharp ", Some(catalog::SHARPNESS.at(1))),
        _ => ("", None),
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Named registry of catalog recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stock recipe, tuned by `config`.
    #[must_use]
    pub fn with_config(config: &CatalogConfig) -> Self {
        let mut book = Self::new();
        book.insert(grill(&config.grill));
        book.insert(grind(&config.grind));
        book.insert(knead(&config.knead));
        book.insert(weave(&config.weave));
        book.insert(smoke(&config.smoke));
        book.insert(temper(&config.temper));
        book
    }

    /// Adds a recipe under its label, replacing any previous one.
    pub fn insert(&mut self, recipe: Recipe) -> Option<Recipe> {
        self.recipes.insert(recipe.label().to_string(), recipe)
    }

    /// Recipe by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// Recipe by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Recipe> {
        self.recipes.get_mut(name)
    }

    /// Recipe names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True if the book holds no recipe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
