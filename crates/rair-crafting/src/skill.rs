//! Skill progression: experience, levels, and prerequisite-gated branches.
//!
//! This module provides:
//! - [`Skill`] experience/level state with an edge-triggered change flag
//! - [`SkillTree`], a DAG of [`Branch`] nodes linked both ways
//! - The static Cooking and Dexterity trees
//!
//! Branch tiers are advisory. A branch listing a prerequisite of a higher
//! tier is reported and recorded on the tree, but still linked. Acquiring a
//! branch does not require its prerequisites to be acquired first.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, error, warn};

use crate::error::CraftingError;

// ============================================================================
// Tiers
// ============================================================================

/// Ordinal depth of a branch, O through XX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tier(u8);

impl Tier {
    /// Highest ordinal.
    pub const MAX_ORDINAL: u8 = 20;

    /// Tier O.
    pub const O: Self = Self(0);
    /// Tier I.
    pub const I: Self = Self(1);
    /// Tier II.
    pub const II: Self = Self(2);
    /// Tier III.
    pub const III: Self = Self(3);
    /// Tier IV.
    pub const IV: Self = Self(4);
    /// Tier V.
    pub const V: Self = Self(5);
    /// Tier X.
    pub const X: Self = Self(10);
    /// Tier XX.
    pub const XX: Self = Self(20);

    /// Creates a tier, clamped to XX.
    #[must_use]
    pub const fn new(ordinal: u8) -> Self {
        if ordinal > Self::MAX_ORDINAL {
            Self(Self::MAX_ORDINAL)
        } else {
            Self(ordinal)
        }
    }

    /// Raw ordinal.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self.0
    }
}

const ROMAN: [&str; 21] = [
    "O", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV",
    "XV", "XVI", "XVII", "XVIII", "XIX", "XX",
];

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROMAN.get(usize::from(self.0)).copied().unwrap_or("?"))
    }
}

// ============================================================================
// Skill kinds
// ============================================================================

/// The concrete skills a crafter can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Food preparation.
    Cooking,
    /// Handiwork.
    Dexterity,
}

impl SkillKind {
    /// All skill kinds.
    pub const ALL: [SkillKind; 2] = [Self::Cooking, Self::Dexterity];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cooking => "Cooking",
            Self::Dexterity => "Dexterity",
        }
    }

    /// Level at which the skill caps.
    #[must_use]
    pub const fn max_level(self) -> u32 {
        match self {
            Self::Cooking => 6,
            Self::Dexterity => 20,
        }
    }

    /// Experience needed per level.
    #[must_use]
    pub const fn max_exp(self) -> f32 {
        match self {
            Self::Cooking => 100.0,
            Self::Dexterity => 200.0,
        }
    }

    /// The branch tree declared for this skill.
    #[must_use]
    pub fn tree(self) -> &'static SkillTree {
        static COOKING: OnceLock<SkillTree> = OnceLock::new();
        static DEXTERITY: OnceLock<SkillTree> = OnceLock::new();
        match self {
            Self::Cooking => COOKING.get_or_init(cooking::tree),
            Self::Dexterity => DEXTERITY.get_or_init(dexterity::tree),
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Branches
// ============================================================================

/// Identifier of a branch, scoped to its skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchId {
    skill: SkillKind,
    index: u16,
}

impl BranchId {
    /// Creates a branch ID.
    #[must_use]
    pub const fn new(skill: SkillKind, index: u16) -> Self {
        Self { skill, index }
    }

    /// Skill the branch belongs to.
    #[must_use]
    pub const fn skill(self) -> SkillKind {
        self.skill
    }
}

/// A node of a skill tree.
#[derive(Debug, Clone)]
pub struct Branch {
    id: BranchId,
    name: String,
    description: String,
    tier: Tier,
    prev: Vec<BranchId>,
    post: Vec<BranchId>,
}

impl Branch {
    /// Branch ID.
    #[must_use]
    pub const fn id(&self) -> BranchId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Player-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tier.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Prerequisite branches.
    #[must_use]
    pub fn prev(&self) -> &[BranchId] {
        &self.prev
    }

    /// Branches listing this one as a prerequisite.
    #[must_use]
    pub fn post(&self) -> &[BranchId] {
        &self.post
    }
}

/// A skill's branch DAG.
#[derive(Debug, Default)]
pub struct SkillTree {
    branches: BTreeMap<BranchId, Branch>,
    inconsistencies: Vec<CraftingError>,
}

impl SkillTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a branch and links it to its prerequisites in both directions.
    ///
    /// A prerequisite of a higher tier is logged and recorded in
    /// [`inconsistencies`](Self::inconsistencies), and linked anyway.
    /// Unknown prerequisites and duplicate IDs are logged and skipped.
    pub fn add_branch(
        &mut self,
        id: BranchId,
        name: impl Into<String>,
        description: impl Into<String>,
        tier: Tier,
        prerequisites: &[BranchId],
    ) -> &mut Self {
        let name = name.into();
        if self.branches.contains_key(&id) {
            warn!("Branch {id:?} ('{name}') is already declared, ignoring");
            return self;
        }

        let mut prev = Vec::with_capacity(prerequisites.len());
        for prereq_id in prerequisites {
            let Some(prereq) = self.branches.get_mut(prereq_id) else {
                warn!("Branch '{name}' lists unknown prerequisite {prereq_id:?}");
                continue;
            };

            if tier < prereq.tier {
                let issue = CraftingError::PrerequisiteInconsistency {
                    branch: name.clone(),
                    tier,
                    prerequisite: prereq.name.clone(),
                    prerequisite_tier: prereq.tier,
                };
                error!("Tree progress between {} -> {tier} is not allowed: {issue}", prereq.tier);
                self.inconsistencies.push(issue);
            }

            prereq.post.push(id);
            prev.push(*prereq_id);
        }

        self.branches.insert(
            id,
            Branch {
                id,
                name,
                description: description.into(),
                tier,
                prev,
                post: Vec::new(),
            },
        );
        self
    }

    /// Looks up a branch.
    #[must_use]
    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(&id)
    }

    /// True if the branch is declared in this tree.
    #[must_use]
    pub fn contains(&self, id: BranchId) -> bool {
        self.branches.contains_key(&id)
    }

    /// All branches, ordered by ID.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Number of declared branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// True if no branch is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Tier violations found while building the tree.
    #[must_use]
    pub fn inconsistencies(&self) -> &[CraftingError] {
        &self.inconsistencies
    }
}

/// Cooking branches.
pub mod cooking {
    use super::{BranchId, SkillKind, SkillTree, Tier};

    /// Grilling over an open fire.
    pub const GRILL: BranchId = BranchId::new(SkillKind::Cooking, 0);
    /// Milling dry ingredients.
    pub const GRIND: BranchId = BranchId::new(SkillKind::Cooking, 1);
    /// Mixing powder with liquid into dough.
    pub const KNEAD: BranchId = BranchId::new(SkillKind::Cooking, 2);
    /// Smoking for flavor and preservation.
    pub const SMOKE: BranchId = BranchId::new(SkillKind::Cooking, 3);
    /// Baking.
    pub const BAKE: BranchId = BranchId::new(SkillKind::Cooking, 4);

    pub(super) fn tree() -> SkillTree {
        let mut tree = SkillTree::new();
        tree.add_branch(GRILL, "Grill", "Briefly roast ingredients over a fire.", Tier::I, &[])
            .add_branch(GRIND, "Grind", "Mill dry ingredients into fine grains.", Tier::II, &[])
            .add_branch(
                KNEAD,
                "Knead",
                "Mix powder into a liquid to form a lump.",
                Tier::III,
                &[GRIND],
            )
            .add_branch(
                SMOKE,
                "Smoke",
                "Expose food to smoke for flavor and preservation.",
                Tier::III,
                &[GRILL],
            )
            .add_branch(BAKE, "Bake", "", Tier::IV, &[KNEAD]);
        tree
    }
}

/// Dexterity branches.
pub mod dexterity {
    use super::{BranchId, SkillKind, SkillTree, Tier};

    /// Efficiency I.
    pub const EFFICIENCY_I: BranchId = BranchId::new(SkillKind::Dexterity, 0);
    /// Efficiency II.
    pub const EFFICIENCY_II: BranchId = BranchId::new(SkillKind::Dexterity, 1);
    /// Efficiency III.
    pub const EFFICIENCY_III: BranchId = BranchId::new(SkillKind::Dexterity, 2);
    /// Efficiency IV.
    pub const EFFICIENCY_IV: BranchId = BranchId::new(SkillKind::Dexterity, 3);
    /// Efficiency V.
    pub const EFFICIENCY_V: BranchId = BranchId::new(SkillKind::Dexterity, 4);
    /// Efficiency mastery.
    pub const EFFICIENCY_MASTER: BranchId = BranchId::new(SkillKind::Dexterity, 5);
    /// Weaving fiber into fabric.
    pub const WEAVE: BranchId = BranchId::new(SkillKind::Dexterity, 6);

    pub(super) fn tree() -> SkillTree {
        let mut tree = SkillTree::new();
        tree.add_branch(EFFICIENCY_I, "Efficiency I", "", Tier::I, &[])
            .add_branch(EFFICIENCY_II, "Efficiency II", "", Tier::II, &[EFFICIENCY_I])
            .add_branch(EFFICIENCY_III, "Efficiency III", "", Tier::III, &[EFFICIENCY_II])
            .add_branch(EFFICIENCY_IV, "Efficiency IV", "", Tier::IV, &[EFFICIENCY_III])
            .add_branch(EFFICIENCY_V, "Efficiency V", "", Tier::V, &[EFFICIENCY_IV])
            .add_branch(
                EFFICIENCY_MASTER,
                "Efficiency Master",
                "",
                Tier::X,
                &[EFFICIENCY_V],
            )
            .add_branch(WEAVE, "Weave", "Weave fiber into fabric.", Tier::III, &[]);
        tree
    }
}

// ============================================================================
// Skill state
// ============================================================================

/// Experience and unlocked branches of one skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    kind: SkillKind,
    exp: f32,
    level: u32,
    total_exp: f32,
    #[serde(skip)]
    seen_total_exp: f32,
    capped: bool,
    acquired: BTreeSet<BranchId>,
}

impl Skill {
    /// Creates a fresh skill at level 0.
    #[must_use]
    pub fn new(kind: SkillKind) -> Self {
        Self {
            kind,
            exp: 0.0,
            level: 0,
            total_exp: 0.0,
            seen_total_exp: 0.0,
            capped: false,
            acquired: BTreeSet::new(),
        }
    }

    /// Concrete skill kind.
    #[must_use]
    pub const fn kind(&self) -> SkillKind {
        self.kind
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Experience in the current level.
    #[must_use]
    pub const fn exp(&self) -> f32 {
        self.exp
    }

    /// Experience needed per level.
    #[must_use]
    pub const fn max_exp(&self) -> f32 {
        self.kind.max_exp()
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Level at which the skill caps.
    #[must_use]
    pub const fn max_level(&self) -> u32 {
        self.kind.max_level()
    }

    /// `level / max_level`.
    #[must_use]
    pub fn level_rate(&self) -> f32 {
        self.level as f32 / self.max_level() as f32
    }

    /// Experience earned over the skill's lifetime.
    #[must_use]
    pub const fn total_exp(&self) -> f32 {
        self.total_exp
    }

    /// True once the skill reached its maximum level.
    #[must_use]
    pub const fn is_capped(&self) -> bool {
        self.capped
    }

    /// Returns true once after every change to the lifetime experience.
    pub fn take_changed(&mut self) -> bool {
        if self.seen_total_exp == self.total_exp {
            return false;
        }
        self.seen_total_exp = self.total_exp;
        true
    }

    /// Adds experience. Returns the new level if this call levelled up.
    ///
    /// Levelling up discards the experience of the finished level; reaching
    /// the maximum level pins the experience at its maximum and caps the
    /// skill, after which this is a no-op. Non-positive amounts are ignored.
    pub fn add_exp(&mut self, amount: f32) -> Option<u32> {
        if self.capped || amount.is_nan() || amount <= 0.0 {
            return None;
        }

        self.exp += amount;
        self.total_exp += amount;

        if self.exp < self.max_exp() {
            return None;
        }

        self.level += 1;
        if self.level >= self.max_level() {
            self.level = self.max_level();
            self.exp = self.max_exp();
            self.capped = true;
            debug!("{} capped at level {}", self.name(), self.level);
        } else {
            self.exp = 0.0;
            debug!("{} reached level {}", self.name(), self.level);
        }
        Some(self.level)
    }

    /// True if the branch is declared for this skill and was acquired.
    #[must_use]
    pub fn acquired(&self, branch: BranchId) -> bool {
        self.kind.tree().contains(branch) && self.acquired.contains(&branch)
    }

    /// Acquires a branch. Returns true if it was newly acquired.
    ///
    /// Branches outside this skill's tree are refused. Prerequisites are not
    /// enforced; see [`prerequisites_met`](Self::prerequisites_met).
    pub fn acquire(&mut self, branch: BranchId) -> bool {
        if !self.kind.tree().contains(branch) {
            warn!("{branch:?} is not a branch of {}", self.name());
            return false;
        }
        self.acquired.insert(branch)
    }

    /// True if every prerequisite of `branch` is acquired.
    #[must_use]
    pub fn prerequisites_met(&self, branch: BranchId) -> bool {
        self.kind
            .tree()
            .get(branch)
            .is_some_and(|b| b.prev().iter().all(|prev| self.acquired(*prev)))
    }

    /// Acquired branches, ordered by ID.
    pub fn acquired_branches(&self) -> impl Iterator<Item = BranchId> + '_ {
        self.acquired.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::O.to_string(), "O");
        assert_eq!(Tier::IV.to_string(), "IV");
        assert_eq!(Tier::new(19).to_string(), "XIX");
        assert_eq!(Tier::new(99), Tier::XX);
    }

    #[test]
    fn test_level_up_discards_remainder() {
        let mut skill = Skill::new(SkillKind::Cooking);
        assert_eq!(skill.add_exp(60.0), None);
        assert_eq!(skill.add_exp(60.0), Some(1));
        assert_eq!(skill.level(), 1);
        assert_eq!(skill.exp(), 0.0);
        assert_eq!(skill.total_exp(), 120.0);
    }

    #[test]
    fn test_cap() {
        let mut skill = Skill::new(SkillKind::Cooking);
        for _ in 0..6 {
            skill.add_exp(100.0);
        }
        assert!(skill.is_capped());
        assert_eq!(skill.level(), 6);
        assert_eq!(skill.exp(), 100.0);

        let total = skill.total_exp();
        assert_eq!(skill.add_exp(50.0), None);
        assert_eq!(skill.level(), 6);
        assert_eq!(skill.exp(), 100.0);
        assert_eq!(skill.total_exp(), total);
    }

    #[test]
    fn test_negative_exp_ignored() {
        let mut skill = Skill::new(SkillKind::Dexterity);
        skill.add_exp(10.0);
        skill.add_exp(-5.0);
        assert_eq!(skill.exp(), 10.0);
    }

    #[test]
    fn test_changed_is_edge_triggered() {
        let mut skill = Skill::new(SkillKind::Dexterity);
        assert!(!skill.take_changed());
        skill.add_exp(0.5);
        assert!(skill.take_changed());
        assert!(!skill.take_changed());
    }

    #[test]
    fn test_acquire_is_idempotent() {
        let mut skill = Skill::new(SkillKind::Cooking);
        assert!(skill.acquire(cooking::GRILL));
        assert!(!skill.acquire(cooking::GRILL));
        assert!(skill.acquired(cooking::GRILL));
        assert!(!skill.acquired(cooking::GRIND));
    }

    #[test]
    fn test_foreign_branch_not_acquired() {
        let mut skill = Skill::new(SkillKind::Cooking);
        assert!(!skill.acquire(dexterity::WEAVE));
        assert!(!skill.acquired(dexterity::WEAVE));
    }

    #[test]
    fn test_prerequisites_are_advisory() {
        let mut skill = Skill::new(SkillKind::Cooking);
        assert!(skill.acquire(cooking::KNEAD));
        assert!(skill.acquired(cooking::KNEAD));
        assert!(!skill.prerequisites_met(cooking::KNEAD));

        skill.acquire(cooking::GRIND);
        assert!(skill.prerequisites_met(cooking::KNEAD));
    }

    #[test]
    fn test_catalog_trees_link_both_ways() {
        let tree = SkillKind::Cooking.tree();
        assert_eq!(tree.len(), 5);
        assert!(tree.inconsistencies().is_empty());

        let grind = tree.get(cooking::GRIND).map(Branch::post);
        assert_eq!(grind, Some(&[cooking::KNEAD][..]));
        let bake = tree.get(cooking::BAKE).map(Branch::prev);
        assert_eq!(bake, Some(&[cooking::KNEAD][..]));

        let dex = SkillKind::Dexterity.tree();
        assert_eq!(dex.len(), 7);
        assert!(dex.contains(dexterity::EFFICIENCY_V));
    }

    #[test]
    fn test_tier_violation_is_recorded_but_linked() {
        let high = BranchId::new(SkillKind::Cooking, 100);
        let low = BranchId::new(SkillKind::Cooking, 101);

        let mut tree = SkillTree::new();
        tree.add_branch(high, "High", "", Tier::V, &[])
            .add_branch(low, "Low", "", Tier::II, &[high]);

        assert_eq!(tree.inconsistencies().len(), 1);
        assert!(matches!(
            tree.inconsistencies()[0],
            CraftingError::PrerequisiteInconsistency { .. }
        ));
        assert_eq!(tree.get(low).map(Branch::prev), Some(&[high][..]));
        assert_eq!(tree.get(high).map(Branch::post), Some(&[low][..]));
    }

    #[test]
    fn test_unknown_prerequisite_skipped() {
        let a = BranchId::new(SkillKind::Dexterity, 50);
        let missing = BranchId::new(SkillKind::Dexterity, 51);
        let mut tree = SkillTree::new();
        tree.add_branch(a, "A", "", Tier::I, &[missing]);
        assert!(tree.get(a).is_some_and(|b| b.prev().is_empty()));
    }

    #[test]
    fn test_level_rate() {
        let mut skill = Skill::new(SkillKind::Cooking);
        skill.add_exp(100.0);
        skill.add_exp(100.0);
        skill.add_exp(100.0);
        assert_eq!(skill.level_rate(), 0.5);
    }
}
