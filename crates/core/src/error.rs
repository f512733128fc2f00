#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No signed-in owner; the store must not be called.
    #[error("not authenticated")]
    AuthRequired,

    /// The store could not be reached or the query failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing recipe.
    pub fn recipe_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "recipe",
            id: id.to_string(),
        }
    }
}

/// Joins the declared rule messages, falling back to `"<field> is invalid"`
/// for rules without one.
impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort_unstable();
        messages.dedup();
        Self::Validation(messages.join("; "))
    }
}
