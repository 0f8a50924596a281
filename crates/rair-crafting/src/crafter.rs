//! The explicit context a recipe runs against.
//!
//! Recipes never reach for a global player. Whoever fills and runs a recipe
//! passes a [`Crafter`]: the owner of the inventory, the trained skills and
//! the installations the recipe reads and mutates.

use crate::events::EventSink;
use crate::installation::Installation;
use crate::item::Item;
use crate::skill::{Skill, SkillKind};

/// Item predicate used for inventory lookups.
pub type ItemFilter<'a> = &'a dyn Fn(&Item) -> bool;

/// Inventory, skills and installations of whoever is crafting.
pub trait Crafter: EventSink {
    /// Copy of the first item matching `predicate`. The inventory keeps its own.
    fn find_item(&self, predicate: ItemFilter<'_>) -> Option<Item>;

    /// Removes and returns the first item matching `predicate`.
    fn find_and_remove_item(&mut self, predicate: ItemFilter<'_>) -> Option<Item>;

    /// Stores an item.
    fn add_item(&mut self, item: Item);

    /// Trained skill of the given kind.
    fn skill(&self, kind: SkillKind) -> Option<&Skill>;

    /// Mutable access to a trained skill.
    fn skill_mut(&mut self, kind: SkillKind) -> Option<&mut Skill>;

    /// Installation by name.
    fn installation(&self, name: &str) -> Option<&Installation>;

    /// Mutable access to an installation.
    fn installation_mut(&mut self, name: &str) -> Option<&mut Installation>;
}
