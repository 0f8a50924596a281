//! Named, leveled item traits.
//!
//! A [`TagTemplate`] is an immutable catalog entry. Attaching a tag to an item
//! always goes through [`TagTemplate::at`], which builds a fresh [`Tag`] owned
//! by that item, so using a tag can never change the catalog.
//!
//! Tags compare by name only: an item holds at most one tag per name, and
//! attaching a second one merges the levels (see [`merge_into`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Immutable catalog entry for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagTemplate {
    /// Tag name, unique within the catalog
    pub name: &'static str,
    /// Lowest level an attached instance may have
    pub min_level: u8,
    /// Highest level an attached instance may have
    pub max_level: u8,
    /// Player-facing description
    pub description: &'static str,
}

impl TagTemplate {
    /// A presence-only tag: always level 1.
    #[must_use]
    pub const fn flag(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            min_level: 1,
            max_level: 1,
            description,
        }
    }

    /// A tag whose level carries meaning.
    #[must_use]
    pub const fn graded(
        name: &'static str,
        min_level: u8,
        max_level: u8,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            min_level,
            max_level,
            description,
        }
    }

    /// Builds a new instance at `level`, clamped to the template range.
    #[must_use]
    pub fn at(&self, level: u8) -> Tag {
        let max_level = self.max_level.max(self.min_level);
        Tag {
            name: self.name.to_string(),
            level: level.clamp(self.min_level, max_level),
            min_level: self.min_level,
            max_level,
            description: self.description.to_string(),
        }
    }

    /// Builds a new level 1 instance.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.at(1)
    }

    /// Checks whether `tag` was built from this template.
    #[must_use]
    pub fn matches(&self, tag: &Tag) -> bool {
        tag.name == self.name
    }
}

/// A tag instance attached to one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    name: String,
    level: u8,
    min_level: u8,
    max_level: u8,
    description: String,
}

impl Tag {
    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Lowest allowed level.
    #[must_use]
    pub const fn min_level(&self) -> u8 {
        self.min_level
    }

    /// Highest allowed level.
    #[must_use]
    pub const fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Player-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Adds the level of a same-named tag, clamped to this tag's range.
    pub fn absorb(&mut self, other: &Tag) {
        let sum = u16::from(self.level) + u16::from(other.level);
        let clamped = sum
            .min(u16::from(self.max_level))
            .max(u16::from(self.min_level));
        self.level = u8::try_from(clamped).unwrap_or(self.max_level);
    }

    /// Same name and at least the level of `required`.
    #[must_use]
    pub fn satisfies(&self, required: &Tag) -> bool {
        self.name == required.name && self.level >= required.level
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max_level > 1 {
            write!(f, "{} Lv.{}", self.name, self.level)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Attaches `tag` to `tags`: merges into a same-named entry, appends otherwise.
pub fn merge_into(tags: &mut Vec<Tag>, tag: Tag) {
    match tags.iter_mut().find(|existing| **existing == tag) {
        Some(existing) => existing.absorb(&tag),
        None => tags.push(tag),
    }
}

/// Folds several tag lists into one, applying [`merge_into`] in input order.
#[must_use]
pub fn merge_tags<'a, I>(groups: I) -> Vec<Tag>
where
    I: IntoIterator<Item = &'a [Tag]>,
{
    let mut merged = Vec::new();
    for group in groups {
        for tag in group {
            merge_into(&mut merged, tag.clone());
        }
    }
    merged
}

/// Static tag catalog.
pub mod catalog {
    use fastrand::Rng;

    use super::{Tag, TagTemplate};

    /// Liquid ingredient.
    pub const LIQUID: TagTemplate = TagTemplate::flag("Liquid", "A liquid.");
    /// Uncooked food.
    pub const RAW_FOOD: TagTemplate = TagTemplate::flag("RawFood", "Uncooked food.");
    /// Safe to eat.
    pub const EDIBLE: TagTemplate = TagTemplate::flag("Edible", "Safe to eat.");
    /// Fine grains, edible or not.
    pub const POWDER: TagTemplate = TagTemplate::flag("Powder", "Fine grains.");
    /// Fine grains that cannot be eaten.
    pub const DUST: TagTemplate = TagTemplate::flag("Dust", "Inedible fine grains.");
    /// Fine grains that can be eaten.
    pub const FLOUR: TagTemplate = TagTemplate::flag("Flour", "Edible fine grains.");
    /// Spun thread.
    pub const THREAD: TagTemplate = TagTemplate::flag("Thread", "Spun thread.");
    /// Raw fiber.
    pub const FIBER: TagTemplate = TagTemplate::flag("Fiber", "Raw plant or animal fiber.");
    /// Woven cloth.
    pub const FABRIC: TagTemplate = TagTemplate::flag("Fabric", "Woven cloth.");
    /// Burnable.
    pub const FUEL: TagTemplate = TagTemplate::flag("Fuel", "Burns well.");
    /// General purpose tool.
    pub const TOOL: TagTemplate = TagTemplate::flag("Tool", "A general purpose tool.");
    /// Sewing tool.
    pub const SEWING_TOOL: TagTemplate = TagTemplate::flag("SewingTool", "A sewing tool.");
    /// Needle. Only crafted needles or rare finds carry it.
    pub const NEEDLE: TagTemplate = TagTemplate::flag("Needle", "A needle.");
    /// Mortar. May share an item with [`PESTLE`].
    pub const MORTAR: TagTemplate = TagTemplate::flag("Mortar", "A grinding bowl.");
    /// Pestle. May share an item with [`MORTAR`].
    pub const PESTLE: TagTemplate = TagTemplate::flag("Pestle", "A grinding club.");

    /// How thoroughly something was cooked.
    pub const COOKED: TagTemplate = TagTemplate::graded("Cooked", 1, 5, "Cooked over fire.");
    /// Defense bonus.
    pub const HARDNESS: TagTemplate =
        TagTemplate::graded("Hardness", 0, 10, "+2.5% defense per level.");
    /// Attack bonus.
    pub const SHARPNESS: TagTemplate =
        TagTemplate::graded("Sharpness", 0, 10, "+2.5% attack per level.");
    /// Flat health bonus.
    pub const HP_UP: TagTemplate = TagTemplate::graded("HpUp", 0, 10, "+500 HP per level.");
    /// Relative health bonus.
    pub const HP_BOOST: TagTemplate = TagTemplate::graded("HpBoost", 0, 10, "+5% HP per level.");

    /// Graded tags a random roll may pick from.
    pub const GRADED: [TagTemplate; 4] = [HP_UP, HP_BOOST, HARDNESS, SHARPNESS];

    /// A uniformly chosen [`GRADED`] tag at level 0.
    pub fn random_tag(rng: &mut Rng) -> Tag {
        GRADED[rng.usize(..GRADED.len())].at(0)
    }
}

#[cfg(test)]
mod tests {
    use super::catalog::*;
    use super::*;

    #[test]
    fn test_template_clamps_level() {
        assert_eq!(COOKED.at(9).level(), 5);
        assert_eq!(COOKED.at(0).level(), 1);
        assert_eq!(HARDNESS.at(0).level(), 0);
        assert_eq!(FIBER.at(3).level(), 1);
    }

    #[test]
    fn test_equality_is_by_name() {
        assert_eq!(COOKED.at(1), COOKED.at(4));
        assert_ne!(FIBER.tag(), FABRIC.tag());
    }

    #[test]
    fn test_merge_sums_and_clamps() {
        let mut tags = vec![COOKED.at(2)];
        merge_into(&mut tags, COOKED.at(2));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].level(), 4);

        merge_into(&mut tags, COOKED.at(3));
        assert_eq!(tags[0].level(), 5);
    }

    #[test]
    fn test_merge_appends_new_names() {
        let mut tags = vec![FIBER.tag()];
        merge_into(&mut tags, NEEDLE.tag());
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].name(), "Needle");
    }

    #[test]
    fn test_merge_does_not_touch_template() {
        let mut tags = vec![HARDNESS.at(3)];
        merge_into(&mut tags, HARDNESS.at(3));
        assert_eq!(HARDNESS.at(3).level(), 3);
        assert_eq!(tags[0].level(), 6);
    }

    #[test]
    fn test_merge_tags_groups() {
        let a = vec![HARDNESS.at(1), FIBER.tag()];
        let b = vec![HARDNESS.at(2)];
        let merged = merge_tags([a.as_slice(), b.as_slice()]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].level(), 3);
    }

    #[test]
    fn test_satisfies() {
        let held = SHARPNESS.at(2);
        assert!(held.satisfies(&SHARPNESS.at(1)));
        assert!(held.satisfies(&SHARPNESS.at(2)));
        assert!(!held.satisfies(&SHARPNESS.at(3)));
        assert!(!held.satisfies(&HARDNESS.at(1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(FIBER.tag().to_string(), "Fiber");
        assert_eq!(COOKED.at(2).to_string(), "Cooked Lv.2");
    }

    #[test]
    fn test_random_tag_draws_graded_templates() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut seen = [false; GRADED.len()];
        for _ in 0..200 {
            let tag = random_tag(&mut rng);
            assert_eq!(tag.level(), 0);
            let index = GRADED.iter().position(|t| t.matches(&tag));
            let Some(index) = index else {
                panic!("{tag} is not a graded tag");
            };
            seen[index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
