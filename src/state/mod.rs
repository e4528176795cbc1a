/// State management module
///
/// This module holds the workflow's persistent state:
/// - The mouse registry backed by a text file (registry.rs)
/// - Shared data structures (data.rs)

pub mod data;
pub mod registry;
