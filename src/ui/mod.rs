/// Screens and shared widgets
///
/// Each screen module owns its state, messages, update and view, and
/// reports cross-screen events (navigation, login, logout, refresh
/// requests) back to main.rs through a returned event value.

pub mod admin;
pub mod login;
pub mod manage;
pub mod portfolio;
pub mod upload;
pub mod widgets;
pub mod work_gallery;
