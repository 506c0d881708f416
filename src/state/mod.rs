/// State management module
///
/// This module handles all application state, including:
/// - Typed API models (data.rs)
/// - The persisted admin session (session.rs)
/// - Remote collection loading and reconciliation (collection.rs)
/// - Pure derived views over loaded collections (derive.rs)
/// - Form state and validation (forms.rs)
/// - Upload drafts (drafts.rs)

pub mod collection;
pub mod data;
pub mod derive;
pub mod drafts;
pub mod forms;
pub mod session;
