//! Requirements: declared, checkable needs a recipe fills before it runs.
//!
//! Four variants share one shape:
//! - [`ItemRequirement`]: 1..N material items, owned by the slot once accepted
//! - [`ToolRequirement`]: a single tool, owned by the slot or shared with another, not consumed
//! - [`SkillRequirement`]: a snapshot of one skill of an expected kind
//! - [`InstallationRequirement`]: a snapshot of a named installation
//!
//! Each variant carries an ordered list of predicates and an index-aligned
//! list of descriptions. A requirement is satisfied when it holds at least
//! `min_count` candidates and every held candidate passes every predicate.
//! Keeping predicates and descriptions apart lets recipe verification catch
//! definitions where the two lists drifted.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::crafter::Crafter;
use crate::error::{ConfigurationIssue, CraftingError, Rejected};
use crate::events::{CraftEvent, EventSink};
use crate::installation::Installation;
use crate::item::Item;
use crate::skill::{Skill, SkillKind};

/// Shared predicate over a candidate.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

// ============================================================================
// Conditions
// ============================================================================

/// Ordered predicates with their descriptions.
pub struct Conditions<T> {
    predicates: Vec<Predicate<T>>,
    descriptions: Vec<String>,
}

impl<T> Conditions<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            descriptions: Vec::new(),
        }
    }

    /// Appends a described predicate.
    pub fn push(
        &mut self,
        description: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) {
        self.predicates.push(Arc::new(predicate));
        self.descriptions.push(description.into());
    }

    /// Appends a predicate without a description.
    pub fn push_predicate(&mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) {
        self.predicates.push(Arc::new(predicate));
    }

    /// Appends a description without a predicate.
    pub fn push_description(&mut self, description: impl Into<String>) {
        self.descriptions.push(description.into());
    }

    /// Number of predicates.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.predicates.len()
    }

    /// Number of descriptions.
    #[must_use]
    pub fn description_count(&self) -> usize {
        self.descriptions.len()
    }

    /// Description of the `index`th predicate.
    #[must_use]
    pub fn description(&self, index: usize) -> String {
        self.descriptions
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Condition #{}", index + 1))
    }

    /// Outcome of every predicate, in declaration order.
    #[must_use]
    pub fn evaluate(&self, candidate: &T) -> Vec<bool> {
        self.predicates.iter().map(|p| p(candidate)).collect()
    }

    /// True if every predicate passes.
    #[must_use]
    pub fn check(&self, candidate: &T) -> bool {
        self.evaluate(candidate).into_iter().all(|passed| passed)
    }

    /// Descriptions of the predicates `candidate` fails.
    #[must_use]
    pub fn failed(&self, candidate: &T) -> Vec<String> {
        self.evaluate(candidate)
            .into_iter()
            .enumerate()
            .filter(|(_, passed)| !passed)
            .map(|(i, _)| self.description(i))
            .collect()
    }

    /// One report line per predicate for a single candidate.
    #[must_use]
    pub fn check_report(&self, candidate: &T) -> Vec<ConditionReport> {
        self.evaluate(candidate)
            .into_iter()
            .enumerate()
            .map(|(i, passed)| ConditionReport {
                description: self.description(i),
                state: ConditionState::from_outcome(passed),
            })
            .collect()
    }

    /// One report line per predicate over every held candidate.
    ///
    /// Lines stay pending while `pending` is set.
    fn slot_report<'a>(
        &self,
        held: impl Iterator<Item = &'a T> + Clone,
        pending: bool,
    ) -> Vec<ConditionReport>
    where
        T: 'a,
    {
        self.predicates
            .iter()
            .enumerate()
            .map(|(i, predicate)| {
                let state = if pending {
                    ConditionState::Pending
                } else {
                    ConditionState::from_outcome(held.clone().all(|c| predicate(c)))
                };
                ConditionReport {
                    description: self.description(i),
                    state,
                }
            })
            .collect()
    }

    fn check_definition(&self, requirement: &str) -> Result<(), ConfigurationIssue> {
        if self.predicates.len() != self.descriptions.len() {
            return Err(ConfigurationIssue::ConditionCountMismatch {
                requirement: requirement.to_string(),
                conditions: self.predicates.len(),
                descriptions: self.descriptions.len(),
            });
        }
        Ok(())
    }
}

impl<T> Default for Conditions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Conditions<T> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            descriptions: self.descriptions.clone(),
        }
    }
}

impl<T> fmt::Debug for Conditions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditions")
            .field("predicates", &self.predicates.len())
            .field("descriptions", &self.descriptions)
            .finish()
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Evaluation state of one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionState {
    /// Not every slot is filled yet
    Pending,
    /// Every held candidate passes
    Passed,
    /// At least one held candidate fails
    Failed,
}

impl ConditionState {
    const fn from_outcome(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// One line of a requirement report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionReport {
    /// Condition description
    pub description: String,
    /// Evaluation state
    pub state: ConditionState,
}

/// Human-readable satisfaction report of a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementReport {
    /// `label`, or `label (n/max)` for multi-slot item requirements
    pub header: String,
    /// One line per condition
    pub conditions: Vec<ConditionReport>,
}

impl fmt::Display for RequirementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.conditions {
            let mark = match line.state {
                ConditionState::Pending => ' ',
                ConditionState::Passed => '+',
                ConditionState::Failed => 'x',
            };
            writeln!(f, "  [{mark}] {}", line.description)?;
        }
        Ok(())
    }
}

// ============================================================================
// Shared interface
// ============================================================================

/// Shape and state every requirement variant exposes.
pub trait RequirementSlot {
    /// Requirement label.
    fn label(&self) -> &str;

    /// Held count reaches the minimum and every held candidate passes.
    fn satisfied(&self) -> bool;

    /// Satisfaction report over the held candidates.
    fn report(&self) -> RequirementReport;

    /// Number of predicates.
    fn condition_count(&self) -> usize;

    /// Number of descriptions.
    fn description_count(&self) -> usize;

    /// Minimum number of candidates.
    fn min_count(&self) -> usize;

    /// Maximum number of candidates.
    fn max_count(&self) -> usize;

    /// Number of held candidates.
    fn held(&self) -> usize;

    /// Drops every held candidate.
    fn clear(&mut self);

    /// Structural sanity of the definition, independent of slot contents.
    fn check_definition(&self) -> Result<(), ConfigurationIssue>;
}

/// Per-candidate checks of a requirement variant.
pub trait CandidateCheck: RequirementSlot {
    /// Candidate type.
    type Candidate;

    /// True if `candidate` passes every condition.
    fn check(&self, candidate: &Self::Candidate) -> bool;

    /// Outcome of each condition for `candidate`.
    fn check_report(&self, candidate: &Self::Candidate) -> Vec<ConditionReport>;
}

fn check_counts(label: &str, min: usize, max: usize) -> Result<(), ConfigurationIssue> {
    if min > max {
        return Err(ConfigurationIssue::CountBounds {
            requirement: label.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn reject<S: EventSink + ?Sized>(
    events: &mut S,
    requirement: &str,
    item: Item,
    failed: Vec<String>,
) -> Rejected<Item> {
    warn!("'{}' rejected by '{requirement}': {}", item.name, failed.join(", "));
    events.log_event(CraftEvent::CandidateRejected {
        requirement: requirement.to_string(),
        candidate: item.name.clone(),
        failed: failed.clone(),
    });
    Rejected {
        error: CraftingError::ConstraintViolation {
            requirement: requirement.to_string(),
            candidate: item.name.clone(),
            failed,
        },
        candidate: item,
    }
}

// ============================================================================
// Item requirement
// ============================================================================

/// 1..N items filling the same role.
#[derive(Debug, Clone)]
pub struct ItemRequirement {
    label: String,
    conditions: Conditions<Item>,
    min_count: usize,
    max_count: usize,
    slots: Vec<Item>,
}

impl ItemRequirement {
    /// Creates a single-item requirement without conditions.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            conditions: Conditions::new(),
            min_count: 1,
            max_count: 1,
            slots: Vec::new(),
        }
    }

    /// Sets both bounds. Not validated until verification.
    #[must_use]
    pub fn count(mut self, min: usize, max: usize) -> Self {
        self.min_count = min;
        self.max_count = max;
        self
    }

    /// Sets the maximum, keeping the minimum.
    #[must_use]
    pub fn max_count(mut self, max: usize) -> Self {
        self.max_count = max;
        self
    }

    /// Adds a described condition.
    #[must_use]
    pub fn condition(
        mut self,
        description: impl Into<String>,
        predicate: impl Fn(&Item) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.conditions.push(description, predicate);
        self
    }

    /// Mutable access to the condition lists.
    pub fn conditions_mut(&mut self) -> &mut Conditions<Item> {
        &mut self.conditions
    }

    /// Accepts `item` if room remains and it passes every condition.
    ///
    /// A refused item is logged and handed back.
    pub fn add<S: EventSink + ?Sized>(
        &mut self,
        item: Item,
        events: &mut S,
    ) -> Result<(), Rejected<Item>> {
        if self.slots.len() >= self.max_count {
            let failed = vec![format!("At most {} allowed", self.max_count)];
            return Err(reject(events, &self.label, item, failed));
        }

        let failed = self.conditions.failed(&item);
        if !failed.is_empty() {
            return Err(reject(events, &self.label, item, failed));
        }

        debug!("'{}' accepted by '{}'", item.name, self.label);
        self.slots.push(item);
        Ok(())
    }

    /// Moves matching items out of the crafter until full. Returns how many.
    pub fn fill_from<C: Crafter + ?Sized>(&mut self, crafter: &mut C) -> usize {
        let mut moved = 0;
        while !self.is_full() {
            let conditions = &self.conditions;
            let Some(item) = crafter.find_and_remove_item(&|item: &Item| conditions.check(item)) else {
                break;
            };
            if let Err(rejected) = self.add(item, crafter) {
                crafter.add_item(rejected.into_candidate());
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Held items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.slots
    }

    /// Mutable access to the held items.
    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.slots
    }

    /// First held item.
    #[must_use]
    pub fn first(&self) -> Option<&Item> {
        self.slots.first()
    }

    /// Takes every held item out of the slot.
    pub fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.slots)
    }

    /// True when no more items are accepted.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.max_count
    }
}

impl RequirementSlot for ItemRequirement {
    fn label(&self) -> &str {
        &self.label
    }

    fn satisfied(&self) -> bool {
        self.slots.len() >= self.min_count && self.slots.iter().all(|i| self.conditions.check(i))
    }

    fn report(&self) -> RequirementReport {
        let header = if self.max_count > 1 {
            format!("{} ({}/{})", self.label, self.slots.len(), self.max_count)
        } else {
            self.label.clone()
        };
        RequirementReport {
            header,
            conditions: self.conditions.slot_report(self.slots.iter(), !self.is_full()),
        }
    }

    fn condition_count(&self) -> usize {
        self.conditions.condition_count()
    }

    fn description_count(&self) -> usize {
        self.conditions.description_count()
    }

    fn min_count(&self) -> usize {
        self.min_count
    }

    fn max_count(&self) -> usize {
        self.max_count
    }

    fn held(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn check_definition(&self) -> Result<(), ConfigurationIssue> {
        self.conditions.check_definition(&self.label)?;
        check_counts(&self.label, self.min_count, self.max_count)
    }
}

impl CandidateCheck for ItemRequirement {
    type Candidate = Item;

    fn check(&self, candidate: &Item) -> bool {
        self.conditions.check(candidate)
    }

    fn check_report(&self, candidate: &Item) -> Vec<ConditionReport> {
        self.conditions.check_report(candidate)
    }
}

// ============================================================================
// Tool requirement
// ============================================================================

/// A single tool, held for the run and handed back afterwards.
///
/// One item may fill several tool requirements of a recipe (a mortar that is
/// also its pestle). The first requirement owns it; the others hold a copy
/// and remember the owner, see [`share`](Self::share).
#[derive(Debug, Clone)]
pub struct ToolRequirement {
    label: String,
    conditions: Conditions<Item>,
    tool: Option<Item>,
    shared_with: Option<usize>,
}

impl ToolRequirement {
    /// Creates a tool requirement without conditions.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            conditions: Conditions::new(),
            tool: None,
            shared_with: None,
        }
    }

    /// Adds a described condition.
    #[must_use]
    pub fn condition(
        mut self,
        description: impl Into<String>,
        predicate: impl Fn(&Item) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.conditions.push(description, predicate);
        self
    }

    /// Mutable access to the condition lists.
    pub fn conditions_mut(&mut self) -> &mut Conditions<Item> {
        &mut self.conditions
    }

    /// Holds `tool` if the slot is free and it passes every condition.
    pub fn hold<S: EventSink + ?Sized>(
        &mut self,
        tool: Item,
        events: &mut S,
    ) -> Result<(), Rejected<Item>> {
        if self.tool.is_some() {
            let failed = vec!["A tool is already held".to_string()];
            return Err(reject(events, &self.label, tool, failed));
        }

        let failed = self.conditions.failed(&tool);
        if !failed.is_empty() {
            return Err(reject(events, &self.label, tool, failed));
        }

        debug!("'{}' held by '{}'", tool.name, self.label);
        self.tool = Some(tool);
        Ok(())
    }

    /// Moves the first matching item out of the crafter. Returns whether one moved.
    pub fn fill_from<C: Crafter + ?Sized>(&mut self, crafter: &mut C) -> bool {
        if self.tool.is_some() {
            return false;
        }
        let conditions = &self.conditions;
        let Some(tool) = crafter.find_and_remove_item(&|item: &Item| conditions.check(item)) else {
            return false;
        };
        match self.hold(tool, crafter) {
            Ok(()) => true,
            Err(rejected) => {
                crafter.add_item(rejected.into_candidate());
                false
            },
        }
    }

    /// Binds a copy of the tool owned by requirement `owner` of the same recipe.
    ///
    /// The copy is never handed back to a crafter; the owner's tool is.
    pub fn share<S: EventSink + ?Sized>(
        &mut self,
        owner: usize,
        tool: Item,
        events: &mut S,
    ) -> Result<(), Rejected<Item>> {
        self.hold(tool, events)?;
        self.shared_with = Some(owner);
        Ok(())
    }

    /// Index of the requirement owning the held tool, if this one holds a copy.
    #[must_use]
    pub const fn shared_with(&self) -> Option<usize> {
        self.shared_with
    }

    /// Held tool.
    #[must_use]
    pub fn tool(&self) -> Option<&Item> {
        self.tool.as_ref()
    }

    /// Mutable access to the held tool.
    pub fn tool_mut(&mut self) -> Option<&mut Item> {
        self.tool.as_mut()
    }

    /// Takes the held tool out of the slot.
    pub fn take(&mut self) -> Option<Item> {
        self.shared_with = None;
        self.tool.take()
    }
}

impl RequirementSlot for ToolRequirement {
    fn label(&self) -> &str {
        &self.label
    }

    fn satisfied(&self) -> bool {
        self.tool.as_ref().is_some_and(|t| self.conditions.check(t))
    }

    fn report(&self) -> RequirementReport {
        RequirementReport {
            header: self.label.clone(),
            conditions: self.conditions.slot_report(self.tool.iter(), self.tool.is_none()),
        }
    }

    fn condition_count(&self) -> usize {
        self.conditions.condition_count()
    }

    fn description_count(&self) -> usize {
        self.conditions.description_count()
    }

    fn min_count(&self) -> usize {
        1
    }

    fn max_count(&self) -> usize {
        1
    }

    fn held(&self) -> usize {
        usize::from(self.tool.is_some())
    }

    fn clear(&mut self) {
        self.tool = None;
        self.shared_with = None;
    }

    fn check_definition(&self) -> Result<(), ConfigurationIssue> {
        self.conditions.check_definition(&self.label)
    }
}

impl CandidateCheck for ToolRequirement {
    type Candidate = Item;

    fn check(&self, candidate: &Item) -> bool {
        self.conditions.check(candidate)
    }

    fn check_report(&self, candidate: &Item) -> Vec<ConditionReport> {
        self.conditions.check_report(candidate)
    }
}

// ============================================================================
// Skill requirement
// ============================================================================

/// A skill of an expected kind meeting level and branch conditions.
#[derive(Debug, Clone)]
pub struct SkillRequirement {
    label: String,
    kind: SkillKind,
    conditions: Conditions<Skill>,
    skill: Option<Skill>,
}

impl SkillRequirement {
    /// Creates a requirement on `kind` without further conditions.
    #[must_use]
    pub fn new(label: impl Into<String>, kind: SkillKind) -> Self {
        Self {
            label: label.into(),
            kind,
            conditions: Conditions::new(),
            skill: None,
        }
    }

    /// Adds a described condition.
    #[must_use]
    pub fn condition(
        mut self,
        description: impl Into<String>,
        predicate: impl Fn(&Skill) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.conditions.push(description, predicate);
        self
    }

    /// Mutable access to the condition lists.
    pub fn conditions_mut(&mut self) -> &mut Conditions<Skill> {
        &mut self.conditions
    }

    /// Expected skill kind.
    #[must_use]
    pub const fn kind(&self) -> SkillKind {
        self.kind
    }

    /// Binds a snapshot of `skill`, replacing any previous one.
    pub fn assign(&mut self, skill: &Skill) {
        if skill.kind() != self.kind {
            debug!("'{}' expects {}, got {}", self.label, self.kind, skill.kind());
        }
        self.skill = Some(skill.clone());
    }

    /// Binds the crafter's skill of the expected kind. Returns whether it has one.
    pub fn fill_from<C: Crafter + ?Sized>(&mut self, crafter: &C) -> bool {
        match crafter.skill(self.kind) {
            Some(skill) => {
                self.assign(skill);
                true
            },
            None => false,
        }
    }

    /// Bound snapshot.
    #[must_use]
    pub fn skill(&self) -> Option<&Skill> {
        self.skill.as_ref()
    }
}

impl RequirementSlot for SkillRequirement {
    fn label(&self) -> &str {
        &self.label
    }

    fn satisfied(&self) -> bool {
        self.skill.as_ref().is_some_and(|s| self.check(s))
    }

    fn report(&self) -> RequirementReport {
        RequirementReport {
            header: self.label.clone(),
            conditions: self.conditions.slot_report(self.skill.iter(), self.skill.is_none()),
        }
    }

    fn condition_count(&self) -> usize {
        self.conditions.condition_count()
    }

    fn description_count(&self) -> usize {
        self.conditions.description_count()
    }

    fn min_count(&self) -> usize {
        1
    }

    fn max_count(&self) -> usize {
        1
    }

    fn held(&self) -> usize {
        usize::from(self.skill.is_some())
    }

    fn clear(&mut self) {
        self.skill = None;
    }

    fn check_definition(&self) -> Result<(), ConfigurationIssue> {
        self.conditions.check_definition(&self.label)
    }
}

impl CandidateCheck for SkillRequirement {
    type Candidate = Skill;

    fn check(&self, candidate: &Skill) -> bool {
        candidate.kind() == self.kind && self.conditions.check(candidate)
    }

    fn check_report(&self, candidate: &Skill) -> Vec<ConditionReport> {
        self.conditions.check_report(candidate)
    }
}

// ============================================================================
// Installation requirement
// ============================================================================

/// A named installation in a usable state.
#[derive(Debug, Clone)]
pub struct InstallationRequirement {
    label: String,
    station: String,
    conditions: Conditions<Installation>,
    installation: Option<Installation>,
}

impl InstallationRequirement {
    /// Creates a requirement on the installation named `station`.
    #[must_use]
    pub fn new(label: impl Into<String>, station: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            station: station.into(),
            conditions: Conditions::new(),
            installation: None,
        }
    }

    /// Adds a described condition.
    #[must_use]
    pub fn condition(
        mut self,
        description: impl Into<String>,
        predicate: impl Fn(&Installation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.conditions.push(description, predicate);
        self
    }

    /// Mutable access to the condition lists.
    pub fn conditions_mut(&mut self) -> &mut Conditions<Installation> {
        &mut self.conditions
    }

    /// Name of the expected installation.
    #[must_use]
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Binds a snapshot of `installation`, replacing any previous one.
    pub fn assign(&mut self, installation: &Installation) {
        self.installation = Some(installation.clone());
    }

    /// Binds the crafter's installation of the expected name.
    pub fn fill_from<C: Crafter + ?Sized>(&mut self, crafter: &C) -> bool {
        match crafter.installation(&self.station) {
            Some(installation) => {
                self.assign(installation);
                true
            },
            None => false,
        }
    }

    /// Bound snapshot.
    #[must_use]
    pub fn installation(&self) -> Option<&Installation> {
        self.installation.as_ref()
    }
}

impl RequirementSlot for InstallationRequirement {
    fn label(&self) -> &str {
        &self.label
    }

    fn satisfied(&self) -> bool {
        self.installation.as_ref().is_some_and(|i| self.check(i))
    }

    fn report(&self) -> RequirementReport {
        RequirementReport {
            header: self.label.clone(),
            conditions: self
                .conditions
                .slot_report(self.installation.iter(), self.installation.is_none()),
        }
    }

    fn condition_count(&self) -> usize {
        self.conditions.condition_count()
    }

    fn description_count(&self) -> usize {
        self.conditions.description_count()
    }

    fn min_count(&self) -> usize {
        1
    }

    fn max_count(&self) -> usize {
        1
    }

    fn held(&self) -> usize {
        usize::from(self.installation.is_some())
    }

    fn clear(&mut self) {
        self.installation = None;
    }

    fn check_definition(&self) -> Result<(), ConfigurationIssue> {
        self.conditions.check_definition(&self.label)
    }
}

impl CandidateCheck for InstallationRequirement {
    type Candidate = Installation;

    fn check(&self, candidate: &Installation) -> bool {
        candidate.name() == self.station && self.conditions.check(candidate)
    }

    fn check_report(&self, candidate: &Installation) -> Vec<ConditionReport> {
        self.conditions.check_report(candidate)
    }
}

// ============================================================================
// Closed set of variants
// ============================================================================

/// Any requirement a recipe can declare.
#[derive(Debug, Clone)]
pub enum Requirement {
    /// Material items
    Item(ItemRequirement),
    /// A tool
    Tool(ToolRequirement),
    /// A skill
    Skill(SkillRequirement),
    /// An installation
    Installation(InstallationRequirement),
}

impl Requirement {
    /// The shared interface of the wrapped variant.
    #[must_use]
    pub fn slot(&self) -> &dyn RequirementSlot {
        match self {
            Self::Item(r) => r,
            Self::Tool(r) => r,
            Self::Skill(r) => r,
            Self::Installation(r) => r,
        }
    }

    /// Mutable shared interface of the wrapped variant.
    pub fn slot_mut(&mut self) -> &mut dyn RequirementSlot {
        match self {
            Self::Item(r) => r,
            Self::Tool(r) => r,
            Self::Skill(r) => r,
            Self::Installation(r) => r,
        }
    }

    /// Requirement label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.slot().label()
    }

    /// See [`RequirementSlot::satisfied`].
    #[must_use]
    pub fn satisfied(&self) -> bool {
        self.slot().satisfied()
    }

    /// See [`RequirementSlot::report`].
    #[must_use]
    pub fn report(&self) -> RequirementReport {
        self.slot().report()
    }

    /// Fills the slots from the crafter. Returns how many candidates were bound.
    pub fn fill_from<C: Crafter + ?Sized>(&mut self, crafter: &mut C) -> usize {
        match self {
            Self::Item(r) => r.fill_from(crafter),
            Self::Tool(r) => usize::from(r.fill_from(crafter)),
            Self::Skill(r) => usize::from(r.fill_from(&*crafter)),
            Self::Installation(r) => usize::from(r.fill_from(&*crafter)),
        }
    }

    /// Empties the slots, handing owned items back to the crafter.
    pub fn release_into<C: Crafter + ?Sized>(&mut self, crafter: &mut C) {
        match self {
            Self::Item(r) => {
                for item in r.take_items() {
                    crafter.add_item(item);
                }
            },
            Self::Tool(r) => {
                let shared = r.shared_with().is_some();
                if let Some(tool) = r.take().filter(|_| !shared) {
                    crafter.add_item(tool);
                }
            },
            Self::Skill(r) => r.clear(),
            Self::Installation(r) => r.clear(),
        }
    }
}

impl From<ItemRequirement> for Requirement {
    fn from(r: ItemRequirement) -> Self {
        Self::Item(r)
    }
}

impl From<ToolRequirement> for Requirement {
    fn from(r: ToolRequirement) -> Self {
        Self::Tool(r)
    }
}

impl From<SkillRequirement> for Requirement {
    fn from(r: SkillRequirement) -> Self {
        Self::Skill(r)
    }
}

impl From<InstallationRequirement> for Requirement {
    fn from(r: InstallationRequirement) -> Self {
        Self::Installation(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::skill::cooking;
    use crate::tag::catalog::*;

    fn fiber(name: &str) -> Item {
        Item::builder(name).durability(20.0).recipe_count(1).tag(FIBER.tag()).build()
    }

    fn fiber_requirement() -> ItemRequirement {
        ItemRequirement::new("Fiber")
            .count(5, 5)
            .condition("Fiber", |item: &Item| item.has(&FIBER))
    }

    #[test]
    fn test_add_rejects_and_returns_candidate() {
        let mut events: Vec<CraftEvent> = Vec::new();
        let mut req = fiber_requirement();

        let pebble = Item::builder("Pebble").build();
        let rejected = req.add(pebble, &mut events);
        let Err(rejected) = rejected else {
            panic!("pebble must be rejected");
        };
        assert_eq!(rejected.candidate.name, "Pebble");
        assert!(matches!(rejected.error, CraftingError::ConstraintViolation { .. }));
        assert_eq!(events.len(), 1);
        assert_eq!(req.held(), 0);
    }

    #[test]
    fn test_add_respects_max_count() {
        let mut events: Vec<CraftEvent> = Vec::new();
        let mut req = fiber_requirement();
        for i in 0..5 {
            assert!(req.add(fiber(&format!("Flax {i}")), &mut events).is_ok());
        }
        assert!(req.is_full());
        assert!(req.add(fiber("Flax 5"), &mut events).is_err());
        assert_eq!(req.held(), 5);
    }

    #[test]
    fn test_satisfied_needs_min_count() {
        let mut events: Vec<CraftEvent> = Vec::new();
        let mut req = fiber_requirement();
        for i in 0..4 {
            let _ = req.add(fiber(&format!("Flax {i}")), &mut events);
        }
        assert!(!req.satisfied());
        let _ = req.add(fiber("Flax 4"), &mut events);
        assert!(req.satisfied());
    }

    #[test]
    fn test_min_one_accepts_partial_fill() {
        let mut events: Vec<CraftEvent> = Vec::new();
        let mut req = ItemRequirement::new("Raw food")
            .max_count(10)
            .condition("RawFood", |item: &Item| item.has(&RAW_FOOD));
        assert!(!req.satisfied());
        let fish = Item::builder("Minnow").calorie(25.0).build();
        assert!(req.add(fish, &mut events).is_ok());
        assert!(req.satisfied());
    }

    #[test]
    fn test_report_states() {
        let mut events: Vec<CraftEvent> = Vec::new();
        let mut req = ItemRequirement::new("Fuel")
            .condition("Fuel", |item: &Item| item.has(&FUEL))
            .condition("Combustibility 100+", |item: &Item| {
                item.combustibility.value >= 100.0
            });

        let report = req.report();
        assert_eq!(report.header, "Fuel");
        assert!(report.conditions.iter().all(|c| c.state == ConditionState::Pending));

        let log = Item::builder("Log").combustibility(150.0).build();
        assert!(req.add(log, &mut events).is_ok());
        let report = req.report();
        assert!(report.conditions.iter().all(|c| c.state == ConditionState::Passed));
        assert!(report.to_string().contains("[+] Combustibility 100+"));
    }

    #[test]
    fn test_multi_slot_header() {
        let req = fiber_requirement();
        assert_eq!(req.report().header, "Fiber (0/5)");
    }

    #[test]
    fn test_check_report_per_condition() {
        let req = ItemRequirement::new("Fuel")
            .condition("Fuel", |item: &Item| item.has(&FUEL))
            .condition("Combustibility 100+", |item: &Item| {
                item.combustibility.value >= 100.0
            });
        let twig = Item::builder("Twig").combustibility(30.0).build();
        let lines = req.check_report(&twig);
        assert_eq!(lines[0].state, ConditionState::Passed);
        assert_eq!(lines[1].state, ConditionState::Failed);
    }

    #[test]
    fn test_definition_mismatch() {
        let mut req = ItemRequirement::new("Broken");
        req.conditions_mut().push_predicate(|_: &Item| true);
        assert!(matches!(
            req.check_definition(),
            Err(ConfigurationIssue::ConditionCountMismatch {
                conditions: 1,
                descriptions: 0,
                ..
            })
        ));

        let req = ItemRequirement::new("Inverted").count(3, 2);
        assert!(matches!(
            req.check_definition(),
            Err(ConfigurationIssue::CountBounds { min: 3, max: 2, .. })
        ));
    }

    #[test]
    fn test_tool_hold_single_slot() {
        let mut events: Vec<CraftEvent> = Vec::new();
        let mut req = ToolRequirement::new("Tool").condition("Tool", |i: &Item| i.has(&TOOL));
        let knife = Item::builder("Knife").durability(10.0).tag(TOOL.tag()).build();
        assert!(req.hold(knife.clone(), &mut events).is_ok());
        assert!(req.satisfied());
        assert!(req.hold(knife, &mut events).is_err());
        assert_eq!(req.take().map(|t| t.name), Some("Knife".to_string()));
        assert!(!req.satisfied());
    }

    #[test]
    fn test_shared_tool_is_not_released() {
        let mut player = Player::new();
        let both = Item::builder("Mortar and pestle")
            .durability(10.0)
            .tags([MORTAR.tag(), PESTLE.tag()])
            .build();
        let mut pestle = Requirement::from(
            ToolRequirement::new("Pestle").condition("Pestle", |i: &Item| i.has(&PESTLE)),
        );
        if let Requirement::Tool(req) = &mut pestle {
            assert!(req.share(1, both, &mut player).is_ok());
            assert!(req.satisfied());
            assert_eq!(req.shared_with(), Some(1));
        }

        pestle.release_into(&mut player);
        assert_eq!(player.item_count(), 0);
        assert_eq!(pestle.slot().held(), 0);
    }

    #[test]
    fn test_skill_requirement_checks_kind() {
        let mut req = SkillRequirement::new("Cooking", SkillKind::Cooking)
            .condition("Level 1+", |s: &Skill| s.level() >= 1)
            .condition("Grill", |s: &Skill| s.acquired(cooking::GRILL));

        let mut skill = Skill::new(SkillKind::Cooking);
        req.assign(&skill);
        assert!(!req.satisfied());

        skill.add_exp(100.0);
        skill.acquire(cooking::GRILL);
        req.assign(&skill);
        assert!(req.satisfied());

        let mut dex = Skill::new(SkillKind::Dexterity);
        dex.add_exp(200.0);
        let req = SkillRequirement::new("Any", SkillKind::Cooking);
        assert!(!req.check(&dex));
    }

    #[test]
    fn test_installation_requirement() {
        let mut req = InstallationRequirement::new("Smokehouse", "Fire pit")
            .condition("Fuel 50+", |i: &Installation| i.fuel() >= 50.0);
        req.assign(&Installation::new("Fire pit").with_fuel(20.0));
        assert!(!req.satisfied());
        req.assign(&Installation::new("Fire pit").with_fuel(80.0));
        assert!(req.satisfied());
        assert!(!req.check(&Installation::new("Kiln").with_fuel(80.0)));
    }

    #[test]
    fn test_fill_from_and_release() {
        let mut player = Player::new();
        for i in 0..7 {
            player.insert(fiber(&format!("Flax {i}")));
        }
        player.insert(Item::builder("Pebble").build());

        let mut req = Requirement::from(fiber_requirement());
        assert_eq!(req.fill_from(&mut player), 5);
        assert!(req.satisfied());
        assert_eq!(player.item_count(), 3);

        req.release_into(&mut player);
        assert_eq!(req.slot().held(), 0);
        assert_eq!(player.item_count(), 8);
    }
}
