//! End-to-end flows across the session, editor and list view-model, backed
//! by the in-memory store and account table.

use std::sync::Arc;

use assert_matches::assert_matches;
use recipebook_app::{
    CategoryFilterViewModel, ListStatus, RecipeEditor, RefreshOutcome, RememberedLogin,
    SessionManager,
};
use recipebook_core::auth::MemoryAuthenticator;
use recipebook_core::category::{CategoryCatalog, CategoryFilter};
use recipebook_core::error::CoreError;
use recipebook_core::recipe::{RecipeFields, RecipeForm};
use recipebook_core::seed;
use recipebook_core::store::{MemoryRecipeStore, RecipeStore};

struct App {
    store: Arc<MemoryRecipeStore>,
    sessions: Arc<SessionManager>,
    editor: RecipeEditor,
    list: CategoryFilterViewModel,
    _data_dir: tempfile::TempDir,
}

fn app() -> App {
    let data_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryRecipeStore::new());
    let catalog = Arc::new(CategoryCatalog::default());
    let sessions = Arc::new(SessionManager::new(
        Arc::new(MemoryAuthenticator::new()),
        RememberedLogin::in_dir(data_dir.path()),
        6,
    ));
    let editor = RecipeEditor::new(store.clone(), sessions.clone(), catalog.clone());
    let list = CategoryFilterViewModel::new(store.clone(), sessions.clone(), catalog);
    App {
        store,
        sessions,
        editor,
        list,
        _data_dir: data_dir,
    }
}

fn form(title: &str, category: &str) -> RecipeForm {
    RecipeForm {
        title: title.into(),
        ingredient: "1 cup flour".into(),
        direction: "Mix\nBake".into(),
        image: None,
        category: Some(category.into()),
    }
}

#[tokio::test]
async fn filter_by_category_and_all() {
    let app = app();
    app.sessions
        .sign_up("chef@example.com", "secret", "secret")
        .await
        .unwrap();
    let cake = app.editor.add(form("Cake", "Dessert")).await.unwrap();
    let wings = app.editor.add(form("Wings", "Appetizer")).await.unwrap();

    app.list.set_category_label("Dessert").await.unwrap();
    assert_eq!(app.list.current_items(), vec![cake.clone()]);

    app.list.set_category_label("all").await.unwrap();
    let items = app.list.current_items();
    assert_eq!(items.len(), 2);
    assert!(items.contains(&cake) && items.contains(&wings));
    assert_eq!(app.list.active_category(), CategoryFilter::All);
}

#[tokio::test]
async fn refresh_without_session_makes_no_store_call() {
    let app = app();

    assert_eq!(
        app.list.refresh().await,
        RefreshOutcome::Failed(CoreError::AuthRequired)
    );
    assert_matches!(
        app.list.current_status(),
        ListStatus::Failed(err) if err.to_string() == "not authenticated"
    );
    assert_eq!(app.store.list_calls(), 0);
}

#[tokio::test]
async fn blank_title_is_rejected_before_the_store() {
    let app = app();
    let session = app
        .sessions
        .sign_up("chef@example.com", "secret", "secret")
        .await
        .unwrap();

    let fields = RecipeFields {
        title: String::new(),
        ingredient: "eggs".into(),
        directions: vec!["Whisk".into()],
        image: None,
        category: Some("Main Course".into()),
    };
    assert_matches!(app.editor.create(fields).await, Err(CoreError::Validation(_)));
    assert!(app
        .store
        .list(session.owner_id, &CategoryFilter::All)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn edits_appear_after_focus_returns() {
    let app = app();
    app.sessions
        .sign_up("chef@example.com", "secret", "secret")
        .await
        .unwrap();
    let soup = app.editor.add(form("Soup", "Main Course")).await.unwrap();
    app.list.on_focus_regained().await;
    assert_eq!(app.list.current_items(), vec![soup.clone()]);

    // Detail screen edits the title, then deletes the recipe.
    let mut edit = app.editor.edit_form(soup.id).await.unwrap();
    edit.title = "Miso Soup".into();
    app.editor.update(soup.id, edit).await.unwrap();
    assert_eq!(app.list.current_items()[0].title, "Soup");

    app.list.on_focus_regained().await;
    assert_eq!(app.list.current_items()[0].title, "Miso Soup");

    app.editor.delete(soup.id).await.unwrap();
    app.list.on_focus_regained().await;
    assert!(app.list.current_items().is_empty());
}

#[tokio::test]
async fn sign_out_stops_further_refreshes() {
    let app = app();
    app.sessions
        .sign_up("chef@example.com", "secret", "secret")
        .await
        .unwrap();
    app.editor.add(form("Cake", "Dessert")).await.unwrap();
    app.list.refresh().await;
    let calls = app.store.list_calls();

    app.sessions.sign_out();
    assert_eq!(
        app.list.refresh().await,
        RefreshOutcome::Failed(CoreError::AuthRequired)
    );
    assert_eq!(app.store.list_calls(), calls);
    // The previous owner's items stay visible until a successful refresh.
    assert_eq!(app.list.current_items().len(), 1);
}

#[tokio::test]
async fn seeded_recipes_group_by_category() {
    let app = app();
    app.sessions
        .sign_up("chef@example.com", "secret", "secret")
        .await
        .unwrap();
    for fields in seed::default_recipes() {
        app.editor.create(fields).await.unwrap();
    }

    app.list.refresh().await;
    let labels: Vec<String> = app.list.grouped().into_iter().map(|(l, _)| l).collect();
    assert_eq!(labels, ["Appetizer", "Main Course", "Dessert"]);
}
