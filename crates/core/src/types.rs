/// Identifies the signed-in user that owns a recipe collection.
pub type OwnerId = uuid::Uuid;

/// Identifies a single recipe document within its owner's collection.
pub type RecipeId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
