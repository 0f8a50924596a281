//! Recipes: verification and execution over a set of requirements.
//!
//! A recipe moves through `Idle -> Filling -> Runnable -> Executed -> Idle`.
//! It tracks no state beyond its requirement slots: it is runnable exactly
//! when every requirement is satisfied, and a successful run empties every
//! slot again.
//!
//! Execution is not transactional. A behavior that fails part way leaves
//! the slots as it found them at the point of failure.

use fastrand::Rng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::crafter::Crafter;
use crate::error::{ConfigurationIssue, CraftingError, CraftingResult};
use crate::events::{CraftEvent, EventSink};
use crate::item::Item;
use crate::requirement::{
    CandidateCheck, InstallationRequirement, ItemRequirement, Requirement, RequirementReport,
    RequirementSlot, SkillRequirement, ToolRequirement,
};
use crate::tag::{self, Tag};

/// What a recipe does once runnable.
///
/// Reads inputs out of the recipe slots and writes results into the crafter.
pub type Behavior =
    Arc<dyn Fn(&mut Recipe, &mut dyn Crafter, &mut Rng) -> CraftingResult<()> + Send + Sync>;

/// A named transformation from satisfied requirements to crafter side effects.
#[derive(Clone)]
pub struct Recipe {
    label: String,
    description: String,
    requirements: Vec<Requirement>,
    behavior: Behavior,
}

impl Recipe {
    /// Starts building a recipe.
    #[must_use]
    pub fn builder(label: impl Into<String>) -> RecipeBuilder {
        RecipeBuilder::new(label)
    }

    /// Recipe label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Player-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Requirements in declaration order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Mutable access to the requirements.
    pub fn requirements_mut(&mut self) -> &mut [Requirement] {
        &mut self.requirements
    }

    /// Requirement by label.
    #[must_use]
    pub fn requirement(&self, label: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.label() == label)
    }

    /// The `nth` item requirement.
    #[must_use]
    pub fn item_requirement(&self, nth: usize) -> Option<&ItemRequirement> {
        self.requirements
            .iter()
            .filter_map(|r| match r {
                Requirement::Item(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` item requirement, mutably.
    pub fn item_requirement_mut(&mut self, nth: usize) -> Option<&mut ItemRequirement> {
        self.requirements
            .iter_mut()
            .filter_map(|r| match r {
                Requirement::Item(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` tool requirement.
    #[must_use]
    pub fn tool_requirement(&self, nth: usize) -> Option<&ToolRequirement> {
        self.requirements
            .iter()
            .filter_map(|r| match r {
                Requirement::Tool(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` tool requirement, mutably.
    pub fn tool_requirement_mut(&mut self, nth: usize) -> Option<&mut ToolRequirement> {
        self.requirements
            .iter_mut()
            .filter_map(|r| match r {
                Requirement::Tool(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` skill requirement.
    #[must_use]
    pub fn skill_requirement(&self, nth: usize) -> Option<&SkillRequirement> {
        self.requirements
            .iter()
            .filter_map(|r| match r {
                Requirement::Skill(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` skill requirement, mutably.
    pub fn skill_requirement_mut(&mut self, nth: usize) -> Option<&mut SkillRequirement> {
        self.requirements
            .iter_mut()
            .filter_map(|r| match r {
                Requirement::Skill(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` installation requirement.
    #[must_use]
    pub fn installation_requirement(&self, nth: usize) -> Option<&InstallationRequirement> {
        self.requirements
            .iter()
            .filter_map(|r| match r {
                Requirement::Installation(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    /// The `nth` installation requirement, mutably.
    pub fn installation_requirement_mut(
        &mut self,
        nth: usize,
    ) -> Option<&mut InstallationRequirement> {
        self.requirements
            .iter_mut()
            .filter_map(|r| match r {
                Requirement::Installation(r) => Some(r),
                _ => None,
            })
            .nth(nth)
    }

    // ------------------------------------------------------------------------
    // Inputs for behaviors
    // ------------------------------------------------------------------------

    fn missing(&self, requirement: impl Into<String>) -> CraftingError {
        CraftingError::MissingInput {
            recipe: self.label.clone(),
            requirement: requirement.into(),
        }
    }

    /// Takes every item held by the `nth` item requirement. Fails when empty.
    pub fn take_items(&mut self, nth: usize) -> CraftingResult<Vec<Item>> {
        let Some(req) = self.item_requirement_mut(nth) else {
            return Err(self.missing(format!("item requirement #{nth}")));
        };
        let items = req.take_items();
        if items.is_empty() {
            let label = req.label().to_string();
            return Err(self.missing(label));
        }
        Ok(items)
    }

    /// Takes the first item held by the `nth` item requirement.
    pub fn take_item(&mut self, nth: usize) -> CraftingResult<Item> {
        let mut items = self.take_items(nth)?;
        Ok(items.swap_remove(0))
    }

    /// Takes the tool held by the `nth` tool requirement.
    ///
    /// A requirement sharing another's tool yields a copy; recipes with more
    /// than one tool requirement should use [`take_tools`](Self::take_tools).
    pub fn take_tool(&mut self, nth: usize) -> CraftingResult<Item> {
        let tool = self.tool_requirement_mut(nth).and_then(ToolRequirement::take);
        tool.ok_or_else(|| self.missing(format!("tool requirement #{nth}")))
    }

    /// Takes every owned tool with the number of tool requirements it filled.
    ///
    /// Copies held by sharing requirements are dropped and counted as uses
    /// of their owner.
    pub fn take_tools(&mut self) -> Vec<(Item, usize)> {
        let mut owned: Vec<(usize, Item, usize)> = Vec::new();
        let mut shared = Vec::new();
        for (index, requirement) in self.requirements.iter_mut().enumerate() {
            let Requirement::Tool(slot) = requirement else {
                continue;
            };
            match slot.shared_with() {
                Some(owner) => {
                    slot.clear();
                    shared.push(owner);
                },
                None => {
                    if let Some(tool) = slot.take() {
                        owned.push((index, tool, 1));
                    }
                },
            }
        }
        for owner in shared {
            if let Some(entry) = owned.iter_mut().find(|(index, ..)| *index == owner) {
                entry.2 += 1;
            }
        }
        owned.into_iter().map(|(_, tool, uses)| (tool, uses)).collect()
    }

    /// Merge of the tags of every held item and tool.
    #[must_use]
    pub fn all_tags(&self) -> Vec<Tag> {
        let mut groups: Vec<&[Tag]> = Vec::new();
        for requirement in &self.requirements {
            match requirement {
                Requirement::Item(r) => groups.extend(r.items().iter().map(Item::tags)),
                Requirement::Tool(r) if r.shared_with().is_none() => {
                    groups.extend(r.tool().map(Item::tags));
                },
                Requirement::Tool(_) => {},
                Requirement::Skill(_) | Requirement::Installation(_) => {},
            }
        }
        tag::merge_tags(groups)
    }

    // ------------------------------------------------------------------------
    // Verification
    // ------------------------------------------------------------------------

    /// Structural check of the definition, independent of slot contents.
    pub fn check_definition(&self) -> CraftingResult<()> {
        let wrap = |issue: ConfigurationIssue| CraftingError::Configuration {
            recipe: self.label.clone(),
            issue,
        };
        if self.requirements.is_empty() {
            return Err(wrap(ConfigurationIssue::NoRequirements));
        }
        for requirement in &self.requirements {
            requirement.slot().check_definition().map_err(wrap)?;
        }
        Ok(())
    }

    /// [`check_definition`](Self::check_definition), reporting failures to `events`.
    pub fn verify<S: EventSink + ?Sized>(&self, events: &mut S) -> bool {
        match self.check_definition() {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}");
                let reason = match &err {
                    CraftingError::Configuration { issue, .. } => issue.to_string(),
                    other => other.to_string(),
                };
                events.log_event(CraftEvent::RecipeMalformed {
                    recipe: self.label.clone(),
                    reason,
                });
                false
            },
        }
    }

    /// True when every requirement is satisfied.
    #[must_use]
    pub fn can_run(&self) -> bool {
        self.requirements.iter().all(Requirement::satisfied)
    }

    /// Labels of the unsatisfied requirements.
    #[must_use]
    pub fn unmet(&self) -> Vec<String> {
        self.requirements
            .iter()
            .filter(|r| !r.satisfied())
            .map(|r| r.label().to_string())
            .collect()
    }

    /// One report per requirement.
    #[must_use]
    pub fn report(&self) -> Vec<RequirementReport> {
        self.requirements.iter().map(Requirement::report).collect()
    }

    // ------------------------------------------------------------------------
    // Filling and running
    // ------------------------------------------------------------------------

    /// Fills every requirement from the crafter. Returns how many candidates were bound.
    ///
    /// Tool requirements the crafter has nothing left for may share a tool
    /// another requirement already holds.
    pub fn fill_from<C: Crafter + ?Sized>(&mut self, crafter: &mut C) -> usize {
        let bound: usize = self
            .requirements
            .iter_mut()
            .map(|r| r.fill_from(crafter))
            .sum();
        bound + self.share_tools(crafter)
    }

    fn share_tools<S: EventSink + ?Sized>(&mut self, events: &mut S) -> usize {
        let mut shared = 0;
        for index in 0..self.requirements.len() {
            let Requirement::Tool(slot) = &self.requirements[index] else {
                continue;
            };
            if slot.tool().is_some() {
                continue;
            }
            let found = self
                .requirements
                .iter()
                .enumerate()
                .find_map(|(owner, requirement)| match requirement {
                    Requirement::Tool(other) if owner != index && other.shared_with().is_none() => {
                        other
                            .tool()
                            .filter(|tool| slot.check(tool))
                            .map(|tool| (owner, tool.clone()))
                    },
                    _ => None,
                });
            let Some((owner, tool)) = found else {
                continue;
            };
            if let Requirement::Tool(slot) = &mut self.requirements[index] {
                if slot.share(owner, tool, events).is_ok() {
                    debug!("'{}' shares the tool of requirement #{owner}", slot.label());
                    shared += 1;
                }
            }
        }
        shared
    }

    /// Verifies, checks readiness, runs the behavior and empties the slots.
    pub fn try_run(&mut self, crafter: &mut dyn Crafter, rng: &mut Rng) -> CraftingResult<()> {
        if !self.verify(crafter) {
            return self.check_definition();
        }

        let unmet = self.unmet();
        if !unmet.is_empty() {
            debug!("{} not ready: {}", self.label, unmet.join(", "));
            crafter.log_event(CraftEvent::RecipeNotReady {
                recipe: self.label.clone(),
                unmet: unmet.clone(),
            });
            return Err(CraftingError::NotReady {
                recipe: self.label.clone(),
                unmet,
            });
        }

        let behavior = Arc::clone(&self.behavior);
        behavior(self, crafter, rng)?;
        self.reset();

        debug!("{} executed", self.label);
        crafter.log_event(CraftEvent::RecipeExecuted {
            recipe: self.label.clone(),
        });
        Ok(())
    }

    /// [`try_run`](Self::try_run) for speculative callers. Returns whether it ran.
    pub fn run(&mut self, crafter: &mut dyn Crafter, rng: &mut Rng) -> bool {
        match self.try_run(crafter, rng) {
            Ok(()) => true,
            Err(err) => {
                debug!("{} did not run: {err}", self.label);
                false
            },
        }
    }

    /// Empties every slot. Held items are dropped.
    pub fn reset(&mut self) {
        for requirement in &mut self.requirements {
            requirement.slot_mut().clear();
        }
    }

    /// Empties every slot, handing held items back to the crafter.
    pub fn reset_into<C: Crafter + ?Sized>(&mut self, crafter: &mut C) {
        for requirement in &mut self.requirements {
            requirement.release_into(crafter);
        }
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("label", &self.label)
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}

/// Builder for recipes.
pub struct RecipeBuilder {
    label: String,
    description: String,
    requirements: Vec<Requirement>,
    behavior: Option<Behavior>,
}

impl RecipeBuilder {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            requirements: Vec::new(),
            behavior: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a requirement.
    #[must_use]
    pub fn requirement(mut self, requirement: impl Into<Requirement>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    /// Sets the behavior.
    #[must_use]
    pub fn behavior<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut Recipe, &mut dyn Crafter, &mut Rng) -> CraftingResult<()> + Send + Sync + 'static,
    {
        self.behavior = Some(Arc::new(behavior));
        self
    }

    /// Builds the recipe. Without a behavior, running only logs a warning.
    #[must_use]
    pub fn build(self) -> Recipe {
        let behavior: Behavior = match self.behavior {
            Some(behavior) => behavior,
            None => Arc::new(missing_behavior),
        };
        Recipe {
            label: self.label,
            description: self.description,
            requirements: self.requirements,
            behavior,
        }
    }
}

fn missing_behavior(recipe: &mut Recipe, _: &mut dyn Crafter, _: &mut Rng) -> CraftingResult<()> {
    warn!("Recipe '{}' has no behavior", recipe.label());
    Ok(())
}
