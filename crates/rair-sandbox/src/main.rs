//! Rair Sandbox
//!
//! Headless walk through the stock recipe catalog: a player gathers, stokes
//! a fire pit, trains and crafts, then prints the inventory and event log.
//!
//! `RAIR_SEED` fixes the random rolls; tuning is read from `rair.toml`.

use anyhow::{Context, Result};
use fastrand::Rng;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rair_crafting::prelude::*;
use rair_crafting::recipes;

const FIRE_PIT: &str = "Fire pit";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("rair=info".parse()?))
        .init();

    info!("Rair sandbox starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let seed = match std::env::var("RAIR_SEED") {
        Ok(value) => value.parse().context("RAIR_SEED must be an integer")?,
        Err(_) => fastrand::u64(..),
    };
    info!("Seed: {seed}");
    let mut rng = Rng::with_seed(seed);

    let config = CatalogConfig::load();
    let mut book = RecipeBook::with_config(&config);
    for name in book.names().map(str::to_string).collect::<Vec<_>>() {
        if book.get(&name).is_some_and(|recipe| !recipe.verify(&mut TracingSink)) {
            warn!("{name} is malformed and will never run");
        }
    }
    info!("{} recipes loaded", book.len());

    let mut player = stocked_player(&mut rng);
    train(&mut player);

    for _ in 0..4 {
        stoke(&mut player, FIRE_PIT)?;
    }
    grill_over_fire_pit(&mut book, &mut player, &mut rng)?;

    for _ in 0..2 {
        stoke(&mut player, FIRE_PIT)?;
    }
    for name in [recipes::SMOKE, recipes::GRIND, recipes::WEAVE, recipes::TEMPER] {
        craft(&mut book, name, &mut player, &mut rng);
    }

    println!("Inventory:");
    print!("{}", player.inventory_listing());
    for kind in SkillKind::ALL {
        if let Some(skill) = player.skill(kind) {
            println!(
                "{}: level {}/{} ({:.1} exp)",
                skill.name(),
                skill.level(),
                skill.max_level(),
                skill.exp()
            );
        }
    }
    println!("Recent events:");
    print!("{}", player.log().render());

    Ok(())
}

fn stocked_player(rng: &mut Rng) -> Player {
    let mut player = Player::new();

    for _ in 0..6 {
        player.insert(
            Item::builder("Stick")
                .kind(ItemKind::Material)
                .durability(10.0)
                .recipe_count(2)
                .combustibility(30.0)
                .build(),
        );
    }
    for _ in 0..2 {
        player.insert(
            Item::builder("Minnow")
                .kind(ItemKind::Food)
                .durability(50.0)
                .recipe_count(3)
                .calorie(25.0)
                .build(),
        );
    }
    for _ in 0..5 {
        player.insert(
            Item::builder("Flax")
                .kind(ItemKind::Material)
                .durability(12.0)
                .recipe_count(1)
                .tag(catalog::FIBER.tag())
                .build(),
        );
    }
    player.insert(
        Item::builder("Stone Knife")
            .kind(ItemKind::Tool)
            .durability(8.0)
            .tag(catalog::TOOL.tag())
            .build(),
    );
    player.insert(
        Item::builder("Bone Needle")
            .kind(ItemKind::Tool)
            .durability(20.0)
            .tags([catalog::SEWING_TOOL.tag(), catalog::NEEDLE.tag()])
            .build(),
    );
    for _ in 0..3 {
        player.insert(
            Item::builder("Wheat")
                .kind(ItemKind::Food)
                .durability(10.0)
                .recipe_count(1)
                .calorie(5.0)
                .build(),
        );
    }
    player.insert(
        Item::builder("Mortar and pestle")
            .kind(ItemKind::Tool)
            .durability(15.0)
            .tags([catalog::MORTAR.tag(), catalog::PESTLE.tag()])
            .build(),
    );

    let mut ore = random_ore(rng);
    ore.add_tag(catalog::random_tag(rng));
    player.insert(ore);
    player.add_installation(Installation::new(FIRE_PIT));

    player
}

fn train(player: &mut Player) {
    if let Some(skill) = player.skill_mut(SkillKind::Cooking) {
        skill.add_exp(skill.max_exp());
        skill.acquire(cooking::GRILL);
        skill.acquire(cooking::GRIND);
        skill.acquire(cooking::SMOKE);
    }
    if let Some(skill) = player.skill_mut(SkillKind::Dexterity) {
        skill.acquire(dexterity::WEAVE);
    }
}

fn stoke(player: &mut Player, installation: &str) -> Result<()> {
    match supply_fuel(player, installation)? {
        Some(amount) => info!("Stoked {installation} with {amount:.0}"),
        None => warn!("Nothing left to stoke {installation} with"),
    }
    Ok(())
}

/// Grills with the fire pit itself standing in for the fuel item.
fn grill_over_fire_pit(book: &mut RecipeBook, player: &mut Player, rng: &mut Rng) -> Result<()> {
    let recipe = book
        .get_mut(recipes::GRILL)
        .context("grill is part of the stock catalog")?;
    let proxy = player
        .installation(FIRE_PIT)
        .map(Installation::as_item)
        .context("the player owns a fire pit")?;
    let proxy_name = proxy.name.clone();

    if let Some(fuel) = recipe.item_requirement_mut(1) {
        if let Err(rejected) = fuel.add(proxy, player) {
            warn!("{FIRE_PIT} can't fuel the grill: {}", rejected.error);
        }
    }
    recipe.fill_from(player);

    match recipe.try_run(player, rng) {
        Ok(()) => info!("{} done", recipe.label()),
        Err(e) => {
            warn!("{e}");
            for report in recipe.report() {
                info!("\n{report}");
            }
            recipe.reset_into(player);
        },
    }

    // The proxy comes back either burnt or untouched; hand its fuel back.
    let proxy = player.find_and_remove_item(&|item: &Item| item.name == proxy_name);
    if let (Some(proxy), Some(pit)) = (proxy, player.installation_mut(FIRE_PIT)) {
        pit.apply_item(&proxy);
        info!("{FIRE_PIT} has {:.0} fuel left", pit.fuel());
    }
    Ok(())
}

fn craft(book: &mut RecipeBook, name: &str, player: &mut Player, rng: &mut Rng) {
    let Some(recipe) = book.get_mut(name) else {
        warn!("No recipe named {name}");
        return;
    };

    recipe.fill_from(player);
    if !recipe.can_run() {
        warn!("{name} is missing: {}", recipe.unmet().join(", "));
        for report in recipe.report() {
            info!("\n{report}");
        }
        recipe.reset_into(player);
        return;
    }

    if recipe.run(player, rng) {
        info!("{name} done");
    } else {
        recipe.reset_into(player);
    }
}
