//! Items: attributes plus a tag collection.
//!
//! Recipes never compare items by identity. Two items are interchangeable for
//! crafting purposes when their attributes and tags satisfy the same
//! predicates. [`Item`] derives `Clone` over owned fields only, so a clone is a
//! fully independent copy: new attribute values and a new tag list.

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, Calorie, Combustibility, Durability, RecipeCount};
use crate::tag::{self, catalog, Tag, TagTemplate};

/// Calorie above which a new item is considered raw food.
pub const RAW_FOOD_CALORIE: f32 = 1.0;

/// Combustibility from which a new item is considered fuel.
pub const FUEL_COMBUSTIBILITY: f32 = 10.0;

/// Broad item category used by recipe predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    /// Generic crafting material.
    #[default]
    Material,
    /// Ore and stone.
    Mineral,
    /// Bladed weapon.
    Blade,
    /// Prepared food.
    Food,
    /// Tool.
    Tool,
}

/// A crafting item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    core_name: String,
    /// Display name
    pub name: String,
    /// Player-facing description
    pub description: String,
    /// Broad category
    pub kind: ItemKind,
    /// Wear
    pub durability: Durability,
    /// Remaining crafting passes
    pub recipe_count: RecipeCount,
    /// Food energy
    pub calorie: Calorie,
    /// Fuel value
    pub combustibility: Combustibility,
    tags: Vec<Tag>,
}

impl Item {
    /// Starts building a new item.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ItemBuilder {
        ItemBuilder::new(name)
    }

    /// Base name used to derive the names of transformed items.
    #[must_use]
    pub fn core_name(&self) -> &str {
        &self.core_name
    }

    /// `prefix + core_name + suffix`.
    #[must_use]
    pub fn derive_name(&self, prefix: &str, suffix: &str) -> String {
        format!("{prefix}{}{suffix}", self.core_name)
    }

    /// Renames the item from its core name.
    pub fn rename(&mut self, prefix: &str, suffix: &str) {
        self.name = self.derive_name(prefix, suffix);
    }

    /// Sets the durability value, clamped to `[0, max]`.
    pub fn set_durability(&mut self, value: f32) {
        self.durability.set_value(value);
    }

    /// Attached tags in attachment order.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Attaches a tag, merging levels with a same-named tag.
    pub fn add_tag(&mut self, tag: Tag) {
        tag::merge_into(&mut self.tags, tag);
    }

    /// Attaches each tag in order.
    pub fn add_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        for tag in tags {
            self.add_tag(tag);
        }
    }

    /// True if a same-named tag of at least `tag`'s level is attached.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|held| held.satisfies(tag))
    }

    /// True if any tag built from `template` is attached.
    #[must_use]
    pub fn has(&self, template: &TagTemplate) -> bool {
        self.tags.iter().any(|held| template.matches(held))
    }

    /// Level of the tag built from `template`, if attached.
    #[must_use]
    pub fn tag_level(&self, template: &TagTemplate) -> Option<u8> {
        self.tags
            .iter()
            .find(|held| template.matches(held))
            .map(Tag::level)
    }

    /// Removes the tag built from `template`. Returns whether one was attached.
    pub fn remove_tag(&mut self, template: &TagTemplate) -> bool {
        let before = self.tags.len();
        self.tags.retain(|held| !template.matches(held));
        before != self.tags.len()
    }

    /// Removes every listed tag. Missing tags are ignored.
    pub fn remove_tags(&mut self, templates: &[TagTemplate]) {
        for template in templates {
            self.remove_tag(template);
        }
    }

    /// Replaces `from` with a fresh instance of `to`.
    pub fn swap_tag(&mut self, from: &TagTemplate, to: &TagTemplate) {
        self.remove_tag(from);
        self.add_tag(to.tag());
    }

    /// Union of this item's tags with `other`. Tags already held win.
    #[must_use]
    pub fn or_merge_tags(&self, other: &[Tag]) -> Vec<Tag> {
        let mut merged = self.tags.clone();
        for tag in other {
            if !merged.contains(tag) {
                merged.push(tag.clone());
            }
        }
        merged
    }

    /// Tags of `other` whose name is also held by this item.
    #[must_use]
    pub fn and_merge_tags(&self, other: &[Tag]) -> Vec<Tag> {
        other
            .iter()
            .filter(|tag| self.tags.contains(tag))
            .cloned()
            .collect()
    }

    /// Attributes shown to the player.
    #[must_use]
    pub fn exposed_attributes(&self) -> Vec<&dyn Attribute> {
        let all: [&dyn Attribute; 4] = [
            &self.durability,
            &self.recipe_count,
            &self.calorie,
            &self.combustibility,
        ];
        all.into_iter().filter(|attr| attr.exposed()).collect()
    }

    /// One-line listing: `name(tag, tag)`.
    #[must_use]
    pub fn listing(&self) -> String {
        if self.tags.is_empty() {
            self.name.clone()
        } else {
            let tags: Vec<String> = self.tags.iter().map(ToString::to_string).collect();
            format!("{}({})", self.name, tags.join(", "))
        }
    }
}

/// Builder for items.
#[derive(Debug)]
pub struct ItemBuilder {
    name: String,
    core_name: String,
    description: String,
    kind: ItemKind,
    durability: f32,
    recipe_count: i32,
    calorie: f32,
    combustibility: f32,
    tags: Vec<Tag>,
}

impl ItemBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core_name: String::new(),
            description: String::new(),
            kind: ItemKind::default(),
            durability: 0.0,
            recipe_count: 0,
            calorie: 0.0,
            combustibility: 0.0,
            tags: Vec::new(),
        }
    }

    /// Sets the core name. Defaults to the display name.
    #[must_use]
    pub fn core_name(mut self, core_name: impl Into<String>) -> Self {
        self.core_name = core_name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the kind.
    #[must_use]
    pub const fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets maximum (and initial) durability.
    #[must_use]
    pub fn durability(mut self, max_value: f32) -> Self {
        self.durability = max_value;
        self
    }

    /// Sets the recipe count.
    #[must_use]
    pub const fn recipe_count(mut self, count: i32) -> Self {
        self.recipe_count = count;
        self
    }

    /// Sets calories. Above [`RAW_FOOD_CALORIE`] the item becomes raw food.
    #[must_use]
    pub fn calorie(mut self, calorie: f32) -> Self {
        self.calorie = calorie;
        self
    }

    /// Sets combustibility. From [`FUEL_COMBUSTIBILITY`] on the item is fuel.
    #[must_use]
    pub fn combustibility(mut self, combustibility: f32) -> Self {
        self.combustibility = combustibility;
        self
    }

    /// Attaches a tag.
    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Attaches several tags.
    #[must_use]
    pub fn tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Builds the item, deriving tags from its attributes first.
    #[must_use]
    pub fn build(self) -> Item {
        let core_name = if self.core_name.is_empty() {
            self.name.clone()
        } else {
            self.core_name
        };

        let mut item = Item {
            core_name,
            name: self.name,
            description: self.description,
            kind: self.kind,
            durability: Durability::new(self.durability),
            recipe_count: RecipeCount::new(self.recipe_count),
            calorie: Calorie::default(),
            combustibility: Combustibility::default(),
            tags: Vec::new(),
        };

        if self.calorie != 0.0 {
            item.calorie.value = self.calorie;
            if self.calorie > RAW_FOOD_CALORIE {
                item.add_tag(catalog::RAW_FOOD.tag());
            }
        }
        if self.combustibility != 0.0 {
            item.combustibility.value = self.combustibility;
            if self.combustibility >= FUEL_COMBUSTIBILITY {
                item.add_tag(catalog::FUEL.tag());
            }
        }

        item.add_tags(self.tags);
        item
    }
}

/// Ore materials a random ore is drawn from.
pub const ORE_MATERIALS: [&str; 6] = ["Bronze", "Lead", "Iron", "Silver", "Platinum", "Obsidian"];

/// A random ore: uniform material, Hardness rolled 2% → 4, 25% → 3, 45% → 2, 28% → 1.
pub fn random_ore(rng: &mut Rng) -> Item {
    let material = ORE_MATERIALS[rng.usize(..ORE_MATERIALS.len())];
    let hardness = match rng.f32() {
        roll if roll > 0.98 => 4,
        roll if roll > 0.73 => 3,
        roll if roll > 0.28 => 2,
        _ => 1,
    };

    Item::builder(format!("{material} Ore"))
        .core_name(material)
        .description("A lump of ore.")
        .kind(ItemKind::Mineral)
        .durability(100.0)
        .recipe_count(1)
        .tag(catalog::HARDNESS.at(hardness))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::catalog::*;

    fn minnow() -> Item {
        Item::builder("Minnow")
            .description("A fresh freshwater fish.")
            .durability(50.0)
            .recipe_count(3)
            .calorie(25.0)
            .build()
    }

    #[test]
    fn test_builder_auto_tags() {
        let fish = minnow();
        assert!(fish.has(&RAW_FOOD));
        assert!(!fish.has(&FUEL));
        assert_eq!(fish.core_name(), "Minnow");

        let stick = Item::builder("Stick")
            .durability(10.0)
            .recipe_count(2)
            .combustibility(30.0)
            .build();
        assert!(stick.has(&FUEL));
        assert!(!stick.has(&RAW_FOOD));
    }

    #[test]
    fn test_low_values_do_not_tag() {
        let crumb = Item::builder("Crumb").calorie(0.5).combustibility(5.0).build();
        assert!(crumb.tags().is_empty());
        assert_eq!(crumb.calorie.value, 0.5);
    }

    #[test]
    fn test_set_durability_clamps() {
        let mut fish = minnow();
        fish.set_durability(80.0);
        assert_eq!(fish.durability.value(), 50.0);
        fish.set_durability(-1.0);
        assert_eq!(fish.durability.value(), 0.0);
    }

    #[test]
    fn test_add_tag_merges() {
        let mut ore = Item::builder("Ore").tag(HARDNESS.at(3)).build();
        ore.add_tags([HARDNESS.at(4), SHARPNESS.at(1)]);
        assert_eq!(ore.tag_level(&HARDNESS), Some(7));
        assert_eq!(ore.tags().len(), 2);
    }

    #[test]
    fn test_has_tag_compares_level() {
        let ore = Item::builder("Ore").tag(HARDNESS.at(2)).build();
        assert!(ore.has_tag(&HARDNESS.at(1)));
        assert!(!ore.has_tag(&HARDNESS.at(3)));
    }

    #[test]
    fn test_remove_missing_tag_is_noop() {
        let mut fish = minnow();
        assert!(!fish.remove_tag(&FIBER));
        fish.remove_tags(&[RAW_FOOD, FIBER]);
        assert!(fish.tags().is_empty());
    }

    #[test]
    fn test_swap_tag() {
        let mut fiber = Item::builder("Flax").tag(FIBER.tag()).build();
        fiber.swap_tag(&FIBER, &FABRIC);
        assert!(!fiber.has(&FIBER));
        assert!(fiber.has(&FABRIC));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = minnow();
        let mut copy = original.clone();
        copy.set_durability(5.0);
        copy.add_tag(COOKED.at(2));
        copy.recipe_count.consume();

        assert_eq!(original.durability.value(), 50.0);
        assert!(!original.has(&COOKED));
        assert_eq!(original.recipe_count.value, 3);
    }

    #[test]
    fn test_or_and_merge() {
        let fish = Item::builder("Fish").calorie(10.0).tag(EDIBLE.tag()).build();
        let other = vec![EDIBLE.tag(), LIQUID.tag()];

        let union = fish.or_merge_tags(&other);
        assert_eq!(union.len(), 3);

        let common = fish.and_merge_tags(&other);
        assert_eq!(common, vec![EDIBLE.tag()]);
    }

    #[test]
    fn test_derive_name() {
        let fish = minnow();
        assert_eq!(fish.derive_name("Grilled ", ""), "Grilled Minnow");
    }

    #[test]
    fn test_exposed_attributes() {
        let stick = Item::builder("Stick").durability(10.0).combustibility(30.0).build();
        let names: Vec<&str> = stick.exposed_attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Durability", "Recipe count"]);
    }

    #[test]
    fn test_random_ore_is_seeded() {
        let mut a = Rng::with_seed(7);
        let mut b = Rng::with_seed(7);
        let ore_a = random_ore(&mut a);
        let ore_b = random_ore(&mut b);
        assert_eq!(ore_a.name, ore_b.name);
        assert_eq!(ore_a.kind, ItemKind::Mineral);
        let hardness = ore_a.tag_level(&HARDNESS).unwrap_or(0);
        assert!((1..=4).contains(&hardness));
        assert!(ore_a.name.ends_with(" Ore"));
    }

    #[test]
    fn test_listing() {
        let fish = minnow();
        assert_eq!(fish.listing(), "Minnow(RawFood)");
    }
}
