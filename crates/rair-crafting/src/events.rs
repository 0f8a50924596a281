//! Crafting notifications.
//!
//! The core reports through an [`EventSink`]: a fire-and-forget collaborator
//! that never feeds anything back. Sinks provided here:
//! - `Vec<CraftEvent>` collects events as-is
//! - [`EventLog`] keeps the latest rendered lines for an on-screen log
//! - [`TracingSink`] forwards every event to `tracing`

use std::collections::VecDeque;
use std::fmt;
use tracing::{info, warn};

/// Something the crafting core wants reported.
#[derive(Debug, Clone, PartialEq)]
pub enum CraftEvent {
    /// A recipe failed verification.
    RecipeMalformed {
        /// Recipe label
        recipe: String,
        /// What is wrong
        reason: String,
    },
    /// A recipe was asked to run with unmet requirements.
    RecipeNotReady {
        /// Recipe label
        recipe: String,
        /// Labels of the unmet requirements
        unmet: Vec<String>,
    },
    /// A requirement refused a candidate.
    CandidateRejected {
        /// Requirement label
        requirement: String,
        /// Candidate display name
        candidate: String,
        /// Descriptions of the failed conditions
        failed: Vec<String>,
    },
    /// An item entered the crafter's inventory.
    ItemGained {
        /// Item display name
        item: String,
    },
    /// An item left the crafter's inventory.
    ItemLost {
        /// Item display name
        item: String,
    },
    /// A recipe ran its behavior.
    RecipeExecuted {
        /// Recipe label
        recipe: String,
    },
    /// Free-form information.
    Notice(String),
}

impl CraftEvent {
    /// True for events that indicate something went wrong.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::RecipeMalformed { .. }
                | Self::RecipeNotReady { .. }
                | Self::CandidateRejected { .. }
        )
    }
}

impl fmt::Display for CraftEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecipeMalformed { recipe, reason } => {
                write!(f, "Check the '{recipe}' recipe definition: {reason}")
            },
            Self::RecipeNotReady { recipe, unmet } => {
                write!(f, "{recipe} needs {}", unmet.join(", "))
            },
            Self::CandidateRejected {
                requirement,
                candidate,
                failed,
            } => {
                if failed.is_empty() {
                    write!(f, "{candidate} does not fit {requirement}")
                } else {
                    write!(
                        f,
                        "{candidate} does not meet {requirement}: {}",
                        failed.join(", ")
                    )
                }
            },
            Self::ItemGained { item } => write!(f, "{item} added"),
            Self::ItemLost { item } => write!(f, "{item} removed"),
            Self::RecipeExecuted { recipe } => write!(f, "{recipe} done"),
            Self::Notice(message) => f.write_str(message),
        }
    }
}

/// Receiver of crafting events.
pub trait EventSink {
    /// Records an event. Must not fail.
    fn log_event(&mut self, event: CraftEvent);
}

impl EventSink for Vec<CraftEvent> {
    fn log_event(&mut self, event: CraftEvent) {
        self.push(event);
    }
}

/// Forwards events to `tracing`: warnings at WARN, the rest at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn log_event(&mut self, event: CraftEvent) {
        if event.is_warning() {
            warn!("{event}");
        } else {
            info!("{event}");
        }
    }
}

/// Bounded log of the most recent rendered events.
#[derive(Debug, Clone)]
pub struct EventLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    /// Lines kept by [`EventLog::default`].
    pub const DEFAULT_CAPACITY: usize = 8;

    /// Creates a log keeping `capacity` lines (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a raw line, dropping the oldest one when full.
    pub fn push_line(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Retained lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of retained lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Retained lines joined with newlines.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl EventSink for EventLog {
    fn log_event(&mut self, event: CraftEvent) {
        self.push_line(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut events: Vec<CraftEvent> = Vec::new();
        events.log_event(CraftEvent::Notice("hello".to_string()));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let mut log = EventLog::default();
        for i in 0..12 {
            log.log_event(CraftEvent::ItemGained {
                item: format!("Stick {i}"),
            });
        }
        assert_eq!(log.len(), EventLog::DEFAULT_CAPACITY);
        assert_eq!(log.lines().next(), Some("Stick 4 added"));
        assert!(log.render().ends_with("Stick 11 added\n"));
    }

    #[test]
    fn test_warning_classification() {
        let rejected = CraftEvent::CandidateRejected {
            requirement: "Fuel".to_string(),
            candidate: "Pebble".to_string(),
            failed: vec!["Combustibility 100+".to_string()],
        };
        assert!(rejected.is_warning());
        assert_eq!(
            rejected.to_string(),
            "Pebble does not meet Fuel: Combustibility 100+"
        );
        assert!(!CraftEvent::Notice(String::new()).is_warning());

        let not_ready = CraftEvent::RecipeNotReady {
            recipe: "Grind".to_string(),
            unmet: vec!["Mortar".to_string(), "Pestle".to_string()],
        };
        assert!(not_ready.is_warning());
        assert_eq!(not_ready.to_string(), "Grind needs Mortar, Pestle");
    }
}
