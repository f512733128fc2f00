pub mod recipe_repo;
pub mod user_repo;

pub use recipe_repo::RecipeRepo;
pub use user_repo::UserRepo;
