//! HTTP request handlers for the Campus web server
//!
//! This module contains all the HTTP request handlers organized by functionality.

pub mod admin;
pub mod content;
pub mod health;
pub mod types;

// Re-export all handler functions to maintain API compatibility
pub use admin::*;
pub use content::*;
pub use health::*;

// Re-export all types for convenience
pub use types::*;
