/// State management module
///
/// This module handles all application state, including:
/// - The nested asset catalog (catalog.rs)
/// - Shared data structures and drawn objects (data.rs)
/// - Configuration and layout constants (config.rs)
/// - The view controller and routing (view.rs)

pub mod catalog;
pub mod config;
pub mod data;
pub mod view;
