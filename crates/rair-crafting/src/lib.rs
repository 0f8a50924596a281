//! # Rair Crafting
//!
//! Crafting rules for Rair.
//!
//! This crate provides:
//! - Items with bounded attributes and leveled, clone-on-attach tags
//! - Requirements (items, tools, skills, installations) and their reports
//! - Recipes: structural verification, readiness and execution
//! - The stock recipe catalog and its TOML tuning
//! - Skills with experience, levels and prerequisite branch trees
//! - The [`Crafter`] context recipes read from and write to, and [`Player`]
//! - Crafting events and the sinks that receive them

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod attribute;
pub mod config;
pub mod crafter;
pub mod error;
pub mod events;
pub mod installation;
pub mod item;
pub mod player;
pub mod recipe;
pub mod recipes;
pub mod requirement;
pub mod selection;
pub mod skill;
pub mod tag;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attribute::*;
    pub use crate::config::*;
    pub use crate::crafter::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::installation::*;
    pub use crate::item::*;
    pub use crate::player::*;
    pub use crate::recipe::*;
    pub use crate::recipes::RecipeBook;
    pub use crate::requirement::*;
    pub use crate::skill::*;
    pub use crate::tag::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clone_does_not_alias_durability() {
        let original = Item::builder("Minnow").durability(50.0).calorie(25.0).build();
        let mut copy = original.clone();
        copy.set_durability(10.0);
        assert_eq!(original.durability.value(), 50.0);
        assert_eq!(copy.durability.value(), 10.0);
    }

    #[test]
    fn test_book_runs_from_player_inventory() {
        let mut player = Player::new();
        player.insert(Item::builder("Flax").durability(12.0).tag(catalog::FIBER.tag()).build());
        let mut book = RecipeBook::with_config(&CatalogConfig::default());
        let Some(weave) = book.get_mut(recipes::WEAVE) else {
            panic!("weave is part of the stock catalog");
        };
        weave.fill_from(&mut player);
        assert!(!weave.can_run());
        weave.reset_into(&mut player);
        assert_eq!(player.item_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_durability_stays_in_bounds(max in 0.0f32..1_000.0, value in -2_000.0f32..2_000.0) {
            let mut item = Item::builder("Thing").durability(max).build();
            item.set_durability(value);
            prop_assert!(item.durability.value() >= 0.0);
            prop_assert!(item.durability.value() <= item.durability.max_value());
        }

        #[test]
        fn prop_rescale_keeps_bounds(max in 0.0f32..500.0, wear in 0.0f32..500.0, new_max in 0.0f32..500.0) {
            let mut item = Item::builder("Thing").durability(max).build();
            item.durability.wear(wear);
            item.durability.rescale(new_max);
            prop_assert!(item.durability.value() >= 0.0);
            prop_assert!(item.durability.value() <= item.durability.max_value());
        }

        #[test]
        fn prop_tag_merge_is_clamped_sum(a in 0u8..=10, b in 0u8..=10) {
            let mut item = Item::builder("Ore").tag(catalog::HARDNESS.at(a)).build();
            item.add_tag(catalog::HARDNESS.at(b));
            prop_assert_eq!(item.tags().len(), 1);
            prop_assert_eq!(item.tag_level(&catalog::HARDNESS), Some((a + b).min(10)));
        }

        #[test]
        fn prop_cooked_level_stays_in_range(levels in proptest::collection::vec(0u8..8, 1..6)) {
            let mut item = Item::builder("Fish").build();
            for level in levels {
                item.add_tag(catalog::COOKED.at(level));
                let held = item.tag_level(&catalog::COOKED).unwrap_or(0);
                prop_assert!((1..=5).contains(&held));
            }
        }

        #[test]
        fn prop_add_exp_never_lowers_level(amounts in proptest::collection::vec(-50.0f32..400.0, 1..40)) {
            let mut skill = Skill::new(SkillKind::Cooking);
            let mut last_level = 0;
            for amount in amounts {
                let (exp, level, capped) = (skill.exp(), skill.level(), skill.is_capped());
                skill.add_exp(amount);
                prop_assert!(skill.level() >= last_level);
                prop_assert!(skill.level() <= skill.max_level());
                if capped {
                    prop_assert_eq!(skill.exp(), exp);
                    prop_assert_eq!(skill.level(), level);
                }
                last_level = skill.level();
            }
        }

        #[test]
        fn prop_satisfied_needs_min_count(min in 1usize..6, held in 0usize..6) {
            let mut req = ItemRequirement::new("Fiber").count(min, 6);
            let mut events: Vec<CraftEvent> = Vec::new();
            for _ in 0..held {
                let _ = req.add(Item::builder("Flax").build(), &mut events);
            }
            prop_assert_eq!(req.satisfied(), held >= min);
        }
    }
}
