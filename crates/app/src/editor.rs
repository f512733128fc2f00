//! Add, edit, detail and delete flows for a single recipe.
//!
//! Writes go straight to the store. Validation runs first, then the owner
//! lookup, and only then the store call, so a rejected form never produces
//! a request. List screens learn about the change on their next focus
//! refresh; the editor never touches a view-model.

use std::path::Path;
use std::sync::Arc;

use recipebook_core::auth::AuthState;
use recipebook_core::category::CategoryCatalog;
use recipebook_core::error::CoreError;
use recipebook_core::image::ImageImporter;
use recipebook_core::recipe::{RecipeFields, RecipeForm, RecipeRecord};
use recipebook_core::store::RecipeStore;
use recipebook_core::types::{OwnerId, RecipeId};

pub struct RecipeEditor {
    store: Arc<dyn RecipeStore>,
    auth: Arc<dyn AuthState>,
    catalog: Arc<CategoryCatalog>,
    images: Option<Arc<dyn ImageImporter>>,
}

impl RecipeEditor {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        auth: Arc<dyn AuthState>,
        catalog: Arc<CategoryCatalog>,
    ) -> Self {
        Self {
            store,
            auth,
            catalog,
            images: None,
        }
    }

    /// Enable [`attach_image`](Self::attach_image).
    pub fn with_images(mut self, images: Arc<dyn ImageImporter>) -> Self {
        self.images = Some(images);
        self
    }

    /// Blank add form.
    pub fn new_form(&self) -> RecipeForm {
        RecipeForm::new(&self.catalog)
    }

    /// Edit form prefilled from the stored record.
    pub async fn edit_form(&self, id: RecipeId) -> Result<RecipeForm, CoreError> {
        let record = self.detail(id).await?;
        Ok(RecipeForm::from_record(&record, &self.catalog))
    }

    /// Copy a picked image into the local library and point the form at it.
    pub async fn attach_image(&self, form: &mut RecipeForm, source: &Path) -> Result<(), CoreError> {
        let images = self
            .images
            .as_ref()
            .ok_or_else(|| CoreError::Internal("no image library configured".into()))?;
        form.image = Some(images.import(source).await?);
        Ok(())
    }

    /// Save a new recipe from the add form.
    pub async fn add(&self, form: RecipeForm) -> Result<RecipeRecord, CoreError> {
        let fields = form.into_fields(&self.catalog)?;
        self.create(fields).await
    }

    /// Save a new recipe from already-structured fields.
    pub async fn create(&self, fields: RecipeFields) -> Result<RecipeRecord, CoreError> {
        fields.check(&self.catalog)?;
        let owner = self.owner()?;
        let record = self.store.create(owner, fields).await?;
        tracing::info!(recipe_id = %record.id, owner_id = %owner, "Recipe added");
        Ok(record)
    }

    /// Replace the fields of an existing recipe from the edit form.
    pub async fn update(&self, id: RecipeId, form: RecipeForm) -> Result<RecipeRecord, CoreError> {
        let fields = form.into_fields(&self.catalog)?;
        let owner = self.owner()?;
        let record = self.store.update(owner, id, fields).await?;
        tracing::info!(recipe_id = %id, owner_id = %owner, "Recipe updated");
        Ok(record)
    }

    pub async fn delete(&self, id: RecipeId) -> Result<(), CoreError> {
        let owner = self.owner()?;
        self.store.delete(owner, id).await?;
        tracing::info!(recipe_id = %id, owner_id = %owner, "Recipe deleted");
        Ok(())
    }

    /// Load one recipe for the detail screen.
    pub async fn detail(&self, id: RecipeId) -> Result<RecipeRecord, CoreError> {
        let owner = self.owner()?;
        self.store
            .get(owner, id)
            .await?
            .ok_or_else(|| CoreError::recipe_not_found(id))
    }

    fn owner(&self) -> Result<OwnerId, CoreError> {
        self.auth.current_user_id().ok_or(CoreError::AuthRequired)
    }
}
