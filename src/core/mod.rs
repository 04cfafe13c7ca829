//! Core functionality for module-root discovery and traversal

pub mod loader;
pub mod walker;

pub use loader::{LoadConfig, LoadMode, UnitLoader};
pub use walker::{FlowControl, VisitResult, Walker};
