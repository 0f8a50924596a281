//! # Rair Common
//!
//! Shared types for the Rair crafting workspace.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Item instance identifiers handed out by inventories
//! - The top-level error type for configuration and IO
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_generation() {
        let id1 = ItemId::new();
        let id2 = ItemId::new();
        assert_ne!(id1, id2);
        assert_ne!(id1.to_string(), id2.to_string());
        assert!(id2.to_string().starts_with('#'));
    }

    #[test]
    fn test_config_error_display() {
        let err = RairError::InvalidConfig("grill.tool_wear must not be negative".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: grill.tool_wear must not be negative"
        );
    }
}
