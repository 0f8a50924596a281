//! Fixed crafting stations.
//!
//! An installation (a fire pit, a smokehouse) is not carried around; the
//! crafter owns it by name. Recipes gate on its state through an
//! [`InstallationRequirement`](crate::requirement::InstallationRequirement)
//! and mutate it through [`Crafter::installation_mut`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crafter::Crafter;
use crate::error::{CraftingError, CraftingResult};
use crate::events::CraftEvent;
use crate::item::Item;
use crate::skill::SkillKind;
use crate::tag::catalog;

/// Dexterity experience granted for stoking an installation.
pub const SUPPLY_FUEL_EXP: f32 = 0.5;

/// A fixed station holding a fuel reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    name: String,
    fuel: f32,
}

impl Installation {
    /// Creates an empty installation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fuel: 0.0,
        }
    }

    /// Sets the initial fuel reserve.
    #[must_use]
    pub fn with_fuel(mut self, fuel: f32) -> Self {
        self.fuel = fuel.max(0.0);
        self
    }

    /// Installation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remaining fuel.
    #[must_use]
    pub const fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Adds fuel.
    pub fn add_fuel(&mut self, amount: f32) {
        self.fuel += amount.max(0.0);
    }

    /// Spends fuel if enough is left. Returns whether it was spent.
    pub fn burn(&mut self, amount: f32) -> bool {
        if self.fuel < amount {
            return false;
        }
        self.fuel -= amount;
        true
    }

    /// The installation seen as an item carrying its fuel as combustibility.
    #[must_use]
    pub fn as_item(&self) -> Item {
        Item::builder(format!("_Installation_{}", self.name))
            .description("Installation state carried as an item.")
            .combustibility(self.fuel)
            .build()
    }

    /// Takes back the fuel of a proxy produced by [`as_item`](Self::as_item).
    pub fn apply_item(&mut self, proxy: &Item) {
        self.fuel = proxy.combustibility.value.max(0.0);
    }
}

/// Burns the crafter's first fuel item in the named installation.
///
/// Returns the fuel added, or `None` when the crafter holds no fuel. Stoking
/// trains Dexterity by [`SUPPLY_FUEL_EXP`].
pub fn supply_fuel<C>(crafter: &mut C, installation: &str) -> CraftingResult<Option<f32>>
where
    C: Crafter + ?Sized,
{
    if crafter.installation(installation).is_none() {
        return Err(CraftingError::MissingInstallation(installation.to_string()));
    }

    let Some(fuel) = crafter.find_and_remove_item(&|item: &Item| item.has(&catalog::FUEL)) else {
        crafter.log_event(CraftEvent::Notice("No fuel item in the inventory".to_string()));
        return Ok(None);
    };

    let amount = fuel.combustibility.value;
    if let Some(station) = crafter.installation_mut(installation) {
        station.add_fuel(amount);
        debug!("{} stoked with {amount:.0}, now {:.0}", station.name(), station.fuel());
    }
    if let Some(dexterity) = crafter.skill_mut(SkillKind::Dexterity) {
        dexterity.add_exp(SUPPLY_FUEL_EXP);
    }
    crafter.log_event(CraftEvent::Notice(format!("Fuel {amount:.0} added")));
    Ok(Some(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    #[test]
    fn test_burn_requires_enough_fuel() {
        let mut pit = Installation::new("Fire pit").with_fuel(40.0);
        assert!(!pit.burn(50.0));
        assert_eq!(pit.fuel(), 40.0);
        assert!(pit.burn(30.0));
        assert_eq!(pit.fuel(), 10.0);
    }

    #[test]
    fn test_proxy_round_trip() {
        let mut pit = Installation::new("Fire pit").with_fuel(120.0);
        let mut proxy = pit.as_item();
        assert!(proxy.has(&catalog::FUEL));
        proxy.combustibility.burn(100.0);
        pit.apply_item(&proxy);
        assert_eq!(pit.fuel(), 20.0);
    }

    #[test]
    fn test_supply_fuel_moves_combustibility() {
        let mut player = Player::new();
        player.add_installation(Installation::new("Fire pit"));
        player.insert(
            Item::builder("Stick")
                .durability(10.0)
                .recipe_count(2)
                .combustibility(30.0)
                .build(),
        );

        let added = supply_fuel(&mut player, "Fire pit").ok().flatten();
        assert_eq!(added, Some(30.0));
        assert_eq!(player.installation("Fire pit").map(Installation::fuel), Some(30.0));
        assert_eq!(player.item_count(), 0);
        let dex = player.skill(SkillKind::Dexterity).map(|s| s.total_exp());
        assert_eq!(dex, Some(SUPPLY_FUEL_EXP));

        assert_eq!(supply_fuel(&mut player, "Fire pit").ok().flatten(), None);
    }

    #[test]
    fn test_supply_fuel_unknown_installation() {
        let mut player = Player::new();
        assert!(matches!(
            supply_fuel(&mut player, "Kiln"),
            Err(CraftingError::MissingInstallation(_))
        ));
    }
}
