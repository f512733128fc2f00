//! Recipe records, write payloads and form input.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::category::CategoryCatalog;
use crate::directions;
use crate::error::CoreError;
use crate::types::{OwnerId, RecipeId, Timestamp};

// ---------------------------------------------------------------------------
// RecipeRecord
// ---------------------------------------------------------------------------

/// A stored recipe as returned by a [`RecipeStore`](crate::store::RecipeStore).
///
/// `id` is assigned by the store; `owner_id` is fixed at creation. Neither
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub owner_id: OwnerId,
    pub title: String,
    pub ingredient: String,
    #[serde(rename = "direction", deserialize_with = "directions::deserialize")]
    pub directions: Vec<String>,
    /// App-local file path of the recipe photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RecipeRecord {
    /// Build a record from write fields. Used by stores on create.
    pub fn from_fields(
        id: RecipeId,
        owner_id: OwnerId,
        fields: RecipeFields,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            title: fields.title,
            ingredient: fields.ingredient,
            directions: fields.directions,
            image: fields.image,
            category: fields.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field in place, keeping `id` and `owner_id`.
    pub fn apply(&mut self, fields: RecipeFields, now: Timestamp) {
        self.title = fields.title;
        self.ingredient = fields.ingredient;
        self.directions = fields.directions;
        self.image = fields.image;
        self.category = fields.category;
        self.updated_at = now;
    }

    /// The write fields currently held by this record.
    pub fn fields(&self) -> RecipeFields {
        RecipeFields {
            title: self.title.clone(),
            ingredient: self.ingredient.clone(),
            directions: self.directions.clone(),
            image: self.image.clone(),
            category: self.category.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecipeFields
// ---------------------------------------------------------------------------

/// The replaceable part of a recipe, used for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RecipeFields {
    #[validate(custom(function = "not_blank", message = "title must not be empty"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "ingredients must not be empty"))]
    pub ingredient: String,
    #[validate(
        length(min = 1, message = "at least one direction step is required"),
        custom(function = "no_blank_steps", message = "direction steps must not be empty")
    )]
    #[serde(rename = "direction", deserialize_with = "directions::deserialize")]
    pub directions: Vec<String>,
    #[validate(length(min = 1, message = "image path must not be empty"))]
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "type", default)]
    pub category: Option<String>,
}

impl RecipeFields {
    /// Record-level invariants: non-blank title and ingredients, at least one
    /// non-blank direction step, a non-empty image path when present, and a
    /// configured category when present.
    pub fn check(&self, catalog: &CategoryCatalog) -> Result<(), CoreError> {
        self.validate()?;
        if let Some(category) = &self.category {
            if !catalog.contains(category) {
                return Err(CoreError::Validation(format!(
                    "Unknown category '{category}'"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecipeForm
// ---------------------------------------------------------------------------

/// Raw input from the add and edit screens.
///
/// Every text field is required; `direction` is the free-text block the
/// user typed.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct RecipeForm {
    #[validate(custom(function = "not_blank", message = "title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "ingredients are required"))]
    pub ingredient: String,
    #[validate(custom(function = "not_blank", message = "directions are required"))]
    pub direction: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl RecipeForm {
    /// An empty add form preset to the catalog's first category.
    pub fn new(catalog: &CategoryCatalog) -> Self {
        Self {
            category: Some(catalog.default_label().to_string()),
            ..Self::default()
        }
    }

    /// An edit form prefilled from a stored record.
    ///
    /// A record without a category starts on the catalog's first label.
    pub fn from_record(record: &RecipeRecord, catalog: &CategoryCatalog) -> Self {
        Self {
            title: record.title.clone(),
            ingredient: record.ingredient.clone(),
            direction: directions::render(&record.directions),
            image: record.image.clone(),
            category: Some(
                record
                    .category
                    .clone()
                    .unwrap_or_else(|| catalog.default_label().to_string()),
            ),
        }
    }

    /// Validate the form and normalize it into write fields.
    pub fn into_fields(self, catalog: &CategoryCatalog) -> Result<RecipeFields, CoreError> {
        self.validate()?;

        let directions = directions::parse_block(&self.direction);
        if directions.is_empty() {
            return Err(CoreError::Validation("directions are required".into()));
        }
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CoreError::Validation("category is required".into()))?;

        let fields = RecipeFields {
            title: self.title.trim().to_string(),
            ingredient: self.ingredient.trim().to_string(),
            directions,
            image: self.image.filter(|p| !p.trim().is_empty()),
            category: Some(category),
        };
        fields.check(catalog)?;
        Ok(fields)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn no_blank_steps(steps: &[String]) -> Result<(), ValidationError> {
    if steps.iter().any(|step| step.trim().is_empty()) {
        return Err(ValidationError::new("blank_step"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn test_record(title: &str, category: Option<&str>) -> RecipeRecord {
    let now = chrono::Utc::now();
    RecipeRecord {
        id: uuid::Uuid::now_v7(),
        owner_id: uuid::Uuid::nil(),
        title: title.to_string(),
        ingredient: "salt".to_string(),
        directions: vec!["cook".to_string()],
        image: None,
        category: category.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn filled_form() -> RecipeForm {
        RecipeForm {
            title: " Pancakes ".into(),
            ingredient: "flour, milk, eggs".into(),
            direction: "1. Whisk\n2. Fry".into(),
            image: Some("/data/img/pancakes.jpg".into()),
            category: Some("Dessert".into()),
        }
    }

    fn fields(title: &str) -> RecipeFields {
        RecipeFields {
            title: title.into(),
            ingredient: "rice".into(),
            directions: vec!["steam".into()],
            image: None,
            category: None,
        }
    }

    #[test]
    fn form_normalizes_into_fields() {
        let fields = filled_form()
            .into_fields(&CategoryCatalog::default())
            .unwrap();
        assert_eq!(fields.title, "Pancakes");
        assert_eq!(fields.directions, ["Whisk", "Fry"]);
        assert_eq!(fields.category.as_deref(), Some("Dessert"));
        assert_eq!(fields.image.as_deref(), Some("/data/img/pancakes.jpg"));
    }

    #[test]
    fn form_requires_every_text_field() {
        let catalog = CategoryCatalog::default();
        for blank in ["title", "ingredient", "direction"] {
            let mut form = filled_form();
            match blank {
                "title" => form.title = "  ".into(),
                "ingredient" => form.ingredient.clear(),
                _ => form.direction = "\n".into(),
            }
            assert_matches!(
                form.into_fields(&catalog),
                Err(CoreError::Validation(msg)) if msg.contains(blank),
                "{blank} should be required"
            );
        }
    }

    #[test]
    fn form_rejects_marker_only_directions() {
        let mut form = filled_form();
        form.direction = "-\n*".into();
        assert_matches!(
            form.into_fields(&CategoryCatalog::default()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn form_rejects_missing_or_unknown_category() {
        let catalog = CategoryCatalog::default();

        let mut form = filled_form();
        form.category = None;
        assert_matches!(form.into_fields(&catalog), Err(CoreError::Validation(_)));

        let mut form = filled_form();
        form.category = Some("Brunch".into());
        assert_matches!(form.into_fields(&catalog), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_image_path_is_dropped() {
        let mut form = filled_form();
        form.image = Some("   ".into());
        let fields = form.into_fields(&CategoryCatalog::default()).unwrap();
        assert!(fields.image.is_none());
    }

    #[test]
    fn new_form_starts_on_first_category() {
        let form = RecipeForm::new(&CategoryCatalog::default());
        assert_eq!(form.category.as_deref(), Some("Appetizer"));
        assert!(form.title.is_empty());
    }

    #[test]
    fn edit_form_prefills_from_record() {
        let catalog = CategoryCatalog::default();
        let mut record = test_record("Soup", None);
        record.directions = vec!["Chop".into(), "Simmer".into()];

        let form = RecipeForm::from_record(&record, &catalog);
        assert_eq!(form.direction, "Chop\nSimmer");
        assert_eq!(form.category.as_deref(), Some("Appetizer"));

        let fields = form.into_fields(&catalog).unwrap();
        assert_eq!(fields.directions, record.directions);
    }

    #[test]
    fn fields_check_enforces_record_invariants() {
        let catalog = CategoryCatalog::default();
        assert!(fields("Rice").check(&catalog).is_ok());
        assert_matches!(fields("").check(&catalog), Err(CoreError::Validation(_)));
        assert_matches!(fields(" ").check(&catalog), Err(CoreError::Validation(_)));

        let mut with_image = fields("Rice");
        with_image.image = Some(String::new());
        assert_matches!(with_image.check(&catalog), Err(CoreError::Validation(_)));

        let mut unknown = fields("Rice");
        unknown.category = Some("Brunch".into());
        assert_matches!(unknown.check(&catalog), Err(CoreError::Validation(_)));
    }

    #[test]
    fn fields_check_requires_ingredients_and_directions() {
        let catalog = CategoryCatalog::default();

        let mut no_ingredient = fields("Rice");
        no_ingredient.ingredient = "  ".into();
        assert_matches!(
            no_ingredient.check(&catalog),
            Err(CoreError::Validation(msg)) if msg == "ingredients must not be empty"
        );

        let mut no_steps = fields("Rice");
        no_steps.directions.clear();
        assert_matches!(
            no_steps.check(&catalog),
            Err(CoreError::Validation(msg)) if msg == "at least one direction step is required"
        );

        let mut blank_step = fields("Rice");
        blank_step.directions.push(" ".into());
        assert_matches!(
            blank_step.check(&catalog),
            Err(CoreError::Validation(msg)) if msg == "direction steps must not be empty"
        );
    }

    #[test]
    fn apply_keeps_identity() {
        let mut record = test_record("Old", Some("Dessert"));
        let (id, owner) = (record.id, record.owner_id);
        let created = record.created_at;

        record.apply(fields("New"), chrono::Utc::now());
        assert_eq!(record.id, id);
        assert_eq!(record.owner_id, owner);
        assert_eq!(record.created_at, created);
        assert_eq!(record.title, "New");
        assert!(record.category.is_none());
    }

    #[test]
    fn record_serializes_type_and_direction_names() {
        let record = test_record("Cake", Some("Dessert"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Dessert");
        assert_eq!(json["direction"][0], "cook");
        assert!(json.get("image").is_none());

        let back: RecipeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
