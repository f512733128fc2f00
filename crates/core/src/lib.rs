//! Domain layer of the recipe book.
//!
//! - [`recipe`] -- recipe records, write fields and form input.
//! - [`directions`] -- free-text / list normalization of directions.
//! - [`category`] -- the configured category catalog and list filters.
//! - [`store`] -- the owner-scoped [`RecipeStore`](store::RecipeStore)
//!   collaborator and its in-memory implementation.
//! - [`auth`] -- sign-in state and credential exchange.
//! - [`image`] -- app-local image library.
//! - [`seed`] -- bundled sample recipes.

pub mod auth;
pub mod category;
pub mod directions;
pub mod error;
pub mod image;
pub mod recipe;
pub mod seed;
pub mod store;
pub mod types;

pub use category::{CategoryCatalog, CategoryFilter};
pub use error::CoreError;
pub use recipe::{RecipeFields, RecipeForm, RecipeRecord};
pub use store::RecipeStore;
