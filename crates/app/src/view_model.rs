//! Category-filtered recipe list view-model.
//!
//! The view-model never mutates its items locally. Every change reaches it
//! by re-querying the store, either because the screen regained focus or
//! because the user picked another category.
//!
//! Each query is tagged when it is issued. Only the response carrying the
//! most recently issued tag may touch the state; anything older is a stale
//! response and is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use recipebook_core::auth::AuthState;
use recipebook_core::category::{CategoryCatalog, CategoryFilter};
use recipebook_core::error::CoreError;
use recipebook_core::recipe::RecipeRecord;
use recipebook_core::store::RecipeStore;
use tokio::sync::broadcast;

/// Buffer size of the state-change channel.
const CHANGE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    Failed(CoreError),
}

/// Everything a list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    /// Result of the last successful query, in store order.
    pub items: Vec<RecipeRecord>,
    pub active_category: CategoryFilter,
    pub status: ListStatus,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            active_category: CategoryFilter::All,
            status: ListStatus::Idle,
        }
    }
}

/// What happened to one refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response was applied and the list is ready.
    Ready { count: usize },
    /// The request failed; previous items were kept.
    Failed(CoreError),
    /// A newer request was issued before this one resolved.
    Superseded,
}

struct Inner {
    state: ListState,
    /// Tag of the most recently issued request.
    issued: u64,
}

// ---------------------------------------------------------------------------
// CategoryFilterViewModel
// ---------------------------------------------------------------------------

/// Owns the recipe list of one screen.
pub struct CategoryFilterViewModel {
    store: Arc<dyn RecipeStore>,
    auth: Arc<dyn AuthState>,
    catalog: Arc<CategoryCatalog>,
    inner: Mutex<Inner>,
    changes: broadcast::Sender<ListState>,
}

impl CategoryFilterViewModel {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        auth: Arc<dyn AuthState>,
        catalog: Arc<CategoryCatalog>,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            store,
            auth,
            catalog,
            inner: Mutex::new(Inner {
                state: ListState::default(),
                issued: 0,
            }),
            changes,
        }
    }

    /// Switch the active category and re-query.
    ///
    /// A filter naming a label outside the catalog is rejected and leaves the
    /// state untouched.
    pub async fn set_category(&self, filter: CategoryFilter) -> Result<RefreshOutcome, CoreError> {
        self.catalog.check_filter(&filter)?;
        let (tag, filter) = self.issue(Some(filter));
        Ok(self.run(tag, filter).await)
    }

    /// [`set_category`](Self::set_category) from a user-facing label such as
    /// `"Dessert"` or `"All Recipes"`.
    pub async fn set_category_label(&self, label: &str) -> Result<RefreshOutcome, CoreError> {
        let filter = self.catalog.filter(label)?;
        self.set_category(filter).await
    }

    /// Re-query the store for the active category.
    ///
    /// Safe to call while earlier refreshes are still in flight; only the
    /// latest issued one takes effect.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (tag, filter) = self.issue(None);
        self.run(tag, filter).await
    }

    /// Called by navigation whenever the screen becomes visible again.
    pub async fn on_focus_regained(&self) -> RefreshOutcome {
        self.refresh().await
    }

    pub fn current_items(&self) -> Vec<RecipeRecord> {
        self.lock().state.items.clone()
    }

    pub fn current_status(&self) -> ListStatus {
        self.lock().state.status.clone()
    }

    pub fn active_category(&self) -> CategoryFilter {
        self.lock().state.active_category.clone()
    }

    pub fn snapshot(&self) -> ListState {
        self.lock().state.clone()
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Current items grouped by catalog category.
    pub fn grouped(&self) -> Vec<(String, Vec<RecipeRecord>)> {
        let items = self.current_items();
        self.catalog
            .group(&items)
            .into_iter()
            .map(|(label, records)| (label, records.into_iter().cloned().collect()))
            .collect()
    }

    /// Receive a snapshot after every applied state change.
    ///
    /// Discarded stale responses produce no message.
    pub fn subscribe(&self) -> broadcast::Receiver<ListState> {
        self.changes.subscribe()
    }

    /// Tag a new request, optionally switching category, and enter `Loading`.
    fn issue(&self, category: Option<CategoryFilter>) -> (u64, CategoryFilter) {
        let mut inner = self.lock();
        inner.issued += 1;
        if let Some(category) = category {
            inner.state.active_category = category;
        }
        inner.state.status = ListStatus::Loading;
        let tag = inner.issued;
        let filter = inner.state.active_category.clone();
        self.publish(&inner.state);
        (tag, filter)
    }

    async fn run(&self, tag: u64, filter: CategoryFilter) -> RefreshOutcome {
        let result = match self.auth.current_user_id() {
            Some(owner) => {
                tracing::debug!(owner_id = %owner, category = %filter, tag, "Refreshing recipe list");
                self.store.list(owner, &filter).await
            }
            None => Err(CoreError::AuthRequired),
        };
        self.apply(tag, result)
    }

    fn apply(&self, tag: u64, result: Result<Vec<RecipeRecord>, CoreError>) -> RefreshOutcome {
        let mut inner = self.lock();
        if tag != inner.issued {
            tracing::debug!(tag, latest = inner.issued, "Discarding stale recipe list response");
            return RefreshOutcome::Superseded;
        }

        let outcome = match result {
            Ok(items) => {
                let count = items.len();
                inner.state.items = items;
                inner.state.status = ListStatus::Ready;
                RefreshOutcome::Ready { count }
            }
            Err(err) => {
                tracing::warn!(error = %err, tag, "Recipe list refresh failed");
                inner.state.status = ListStatus::Failed(err.clone());
                RefreshOutcome::Failed(err)
            }
        };
        self.publish(&inner.state);
        outcome
    }

    fn publish(&self, state: &ListState) {
        // Zero receivers is not an error.
        let _ = self.changes.send(state.clone());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
