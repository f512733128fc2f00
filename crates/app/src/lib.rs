//! Screen-level flows of the recipe book.
//!
//! - [`view_model`] -- the category-filtered recipe list.
//! - [`editor`] -- add, edit, detail and delete of a single recipe.
//! - [`session`] -- sign-in state and the remembered login.
//! - [`config`] -- environment configuration.
//! - [`logging`] -- tracing subscriber setup.

pub mod config;
pub mod editor;
pub mod logging;
pub mod session;
pub mod view_model;

pub use config::{AppConfig, ConfigError};
pub use editor::RecipeEditor;
pub use session::{RememberedLogin, Session, SessionManager};
pub use view_model::{CategoryFilterViewModel, ListState, ListStatus, RefreshOutcome};
