//! Crafting error types.

use thiserror::Error;

use crate::skill::{SkillKind, Tier};

/// Structural problems of a recipe definition, found by verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationIssue {
    /// The recipe declares no requirement at all
    #[error("no requirements registered, at least one is needed")]
    NoRequirements,
    /// Condition and description lists differ in length
    #[error("requirement '{requirement}' has {conditions} conditions but {descriptions} descriptions")]
    ConditionCountMismatch {
        /// Requirement label
        requirement: String,
        /// Number of predicates
        conditions: usize,
        /// Number of descriptions
        descriptions: usize,
    },
    /// Minimum slot count exceeds the maximum
    #[error("requirement '{requirement}' needs at least {min} but holds at most {max}")]
    CountBounds {
        /// Requirement label
        requirement: String,
        /// Minimum count
        min: usize,
        /// Maximum count
        max: usize,
    },
}

/// Crafting error types.
#[derive(Debug, Error)]
pub enum CraftingError {
    /// The recipe definition is malformed
    #[error("Recipe '{recipe}' is malformed: {issue}")]
    Configuration {
        /// Recipe label
        recipe: String,
        /// What is wrong
        issue: ConfigurationIssue,
    },
    /// A candidate failed one or more predicates, or there was no room left
    #[error("'{candidate}' does not fit '{requirement}': {}", .failed.join(", "))]
    ConstraintViolation {
        /// Requirement label
        requirement: String,
        /// Candidate display name
        candidate: String,
        /// Descriptions of the failed conditions
        failed: Vec<String>,
    },
    /// Run was requested while requirements are unmet
    #[error("Recipe '{recipe}' is not ready: {}", .unmet.join(", "))]
    NotReady {
        /// Recipe label
        recipe: String,
        /// Labels of the unmet requirements
        unmet: Vec<String>,
    },
    /// A branch lists a prerequisite of a higher tier
    #[error("Branch '{branch}' ({tier}) lists prerequisite '{prerequisite}' of higher tier {prerequisite_tier}")]
    PrerequisiteInconsistency {
        /// Branch name
        branch: String,
        /// Branch tier
        tier: Tier,
        /// Prerequisite name
        prerequisite: String,
        /// Prerequisite tier
        prerequisite_tier: Tier,
    },
    /// A behavior found an empty slot it relies on
    #[error("Recipe '{recipe}' has nothing in '{requirement}'")]
    MissingInput {
        /// Recipe label
        recipe: String,
        /// Requirement label
        requirement: String,
    },
    /// The crafter does not own the skill a behavior trains
    #[error("Crafter has no {0} skill")]
    MissingSkill(SkillKind),
    /// The crafter does not own the installation a behavior uses
    #[error("Crafter has no installation named '{0}'")]
    MissingInstallation(String),
}

/// Result type for crafting operations.
pub type CraftingResult<T> = Result<T, CraftingError>;

/// A candidate refused by a requirement, handed back to the caller.
#[derive(Debug)]
pub struct Rejected<T> {
    /// The refused candidate
    pub candidate: T,
    /// Why it was refused
    pub error: CraftingError,
}

impl<T> Rejected<T> {
    /// Gives the candidate back.
    pub fn into_candidate(self) -> T {
        self.candidate
    }
}
