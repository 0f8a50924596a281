//! The provided [`Crafter`]: an inventory, two skills and named installations.

use std::collections::BTreeMap;
use tracing::debug;

use rair_common::ItemId;

use crate::crafter::{Crafter, ItemFilter};
use crate::events::{CraftEvent, EventLog, EventSink};
use crate::installation::Installation;
use crate::item::Item;
use crate::skill::{Skill, SkillKind};

/// A crafter owning its items, skills and installations.
#[derive(Debug, Clone)]
pub struct Player {
    items: Vec<(ItemId, Item)>,
    skills: BTreeMap<SkillKind, Skill>,
    installations: BTreeMap<String, Installation>,
    log: EventLog,
}

impl Player {
    /// Creates a player with fresh Cooking and Dexterity skills.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            skills: SkillKind::ALL
                .into_iter()
                .map(|kind| (kind, Skill::new(kind)))
                .collect(),
            installations: BTreeMap::new(),
            log: EventLog::default(),
        }
    }

    /// Stores an item and returns its inventory ID.
    pub fn insert(&mut self, item: Item) -> ItemId {
        let id = ItemId::new();
        self.log_event(CraftEvent::ItemGained {
            item: item.name.clone(),
        });
        self.items.push((id, item));
        id
    }

    /// Removes an item by ID.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|(held, _)| *held == id)?;
        let (_, item) = self.items.remove(index);
        self.log_event(CraftEvent::ItemLost {
            item: item.name.clone(),
        });
        Some(item)
    }

    /// Item by ID.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items
            .iter()
            .find(|(held, _)| *held == id)
            .map(|(_, item)| item)
    }

    /// Held items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    /// Number of held items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Adds or replaces an installation.
    pub fn add_installation(&mut self, installation: Installation) {
        self.installations
            .insert(installation.name().to_string(), installation);
    }

    /// Recent events.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// One line per held item, with its tags.
    #[must_use]
    pub fn inventory_listing(&self) -> String {
        let mut out = String::new();
        for (id, item) in &self.items {
            out.push_str(&format!("{id} {}\n", item.listing()));
        }
        out
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for Player {
    fn log_event(&mut self, event: CraftEvent) {
        debug!("{event}");
        self.log.log_event(event);
    }
}

impl Crafter for Player {
    fn find_item(&self, predicate: ItemFilter<'_>) -> Option<Item> {
        self.items
            .iter()
            .find(|(_, item)| predicate(item))
            .map(|(_, item)| item.clone())
    }

    fn find_and_remove_item(&mut self, predicate: ItemFilter<'_>) -> Option<Item> {
        let index = self.items.iter().position(|(_, item)| predicate(item))?;
        Some(self.items.remove(index).1)
    }

    fn add_item(&mut self, item: Item) {
        self.insert(item);
    }

    fn skill(&self, kind: SkillKind) -> Option<&Skill> {
        self.skills.get(&kind)
    }

    fn skill_mut(&mut self, kind: SkillKind) -> Option<&mut Skill> {
        self.skills.get_mut(&kind)
    }

    fn installation(&self, name: &str) -> Option<&Installation> {
        self.installations.get(name)
    }

    fn installation_mut(&mut self, name: &str) -> Option<&mut Installation> {
        self.installations.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::catalog::FUEL;

    fn stick() -> Item {
        Item::builder("Stick")
            .durability(10.0)
            .recipe_count(2)
            .combustibility(30.0)
            .build()
    }

    #[test]
    fn test_insert_and_remove() {
        let mut player = Player::new();
        let id = player.insert(stick());
        assert_eq!(player.item(id).map(|i| i.name.as_str()), Some("Stick"));

        let removed = player.remove_item(id);
        assert!(removed.is_some());
        assert!(player.remove_item(id).is_none());
        assert_eq!(player.log().lines().last(), Some("Stick removed"));
    }

    #[test]
    fn test_find_item_returns_copy() {
        let mut player = Player::new();
        player.insert(stick());

        let mut copy = player.find_item(&|i: &Item| i.has(&FUEL)).unwrap_or_else(stick);
        copy.set_durability(1.0);

        let held = player.items().next().map(|(_, i)| i.durability.value());
        assert_eq!(held, Some(10.0));
    }

    #[test]
    fn test_find_and_remove_takes_first_match() {
        let mut player = Player::new();
        player.insert(Item::builder("Pebble").build());
        player.insert(stick());
        player.insert(stick());

        let taken = player.find_and_remove_item(&|i: &Item| i.has(&FUEL));
        assert_eq!(taken.map(|i| i.name), Some("Stick".to_string()));
        assert_eq!(player.item_count(), 2);
        assert!(player.find_and_remove_item(&|i: &Item| i.name == "Rock").is_none());
    }

    #[test]
    fn test_starts_with_both_skills() {
        let player = Player::new();
        for kind in SkillKind::ALL {
            assert_eq!(player.skill(kind).map(Skill::level), Some(0));
        }
    }

    #[test]
    fn test_inventory_listing() {
        let mut player = Player::new();
        player.insert(stick());
        assert!(player.inventory_listing().contains("Stick(Fuel)"));
    }
}
