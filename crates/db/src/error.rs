//! Translation of database errors into the domain error taxonomy.

use recipebook_core::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Classify a sqlx error.
///
/// - `RowNotFound` maps to [`CoreError::NotFound`] for `entity`.
/// - Unique violations on `uq_` constraints map to [`CoreError::Conflict`].
/// - Foreign-key and check violations map to [`CoreError::Validation`].
/// - Everything else is [`CoreError::StoreUnavailable`].
pub fn map_sqlx_error(err: sqlx::Error, entity: &'static str) -> CoreError {
    match err {
        sqlx::Error::RowNotFound => CoreError::NotFound {
            entity,
            id: "unknown".into(),
        },
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => CoreError::Conflict(
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                Some(FOREIGN_KEY_VIOLATION) => CoreError::Validation(format!(
                    "Referenced record does not exist ({constraint})"
                )),
                Some(CHECK_VIOLATION) => {
                    CoreError::Validation(format!("Value rejected by {constraint}"))
                }
                _ => {
                    tracing::error!(error = %db_err, entity, "Database error");
                    CoreError::StoreUnavailable(db_err.to_string())
                }
            }
        }
        other => {
            tracing::warn!(error = %other, entity, "Database unavailable");
            CoreError::StoreUnavailable(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn row_not_found_names_entity() {
        assert_matches!(
            map_sqlx_error(sqlx::Error::RowNotFound, "recipe"),
            CoreError::NotFound { entity: "recipe", .. }
        );
    }

    #[test]
    fn pool_failures_are_unavailable() {
        assert_matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut, "recipe"),
            CoreError::StoreUnavailable(_)
        );
        assert_matches!(
            map_sqlx_error(sqlx::Error::PoolClosed, "user"),
            CoreError::StoreUnavailable(_)
        );
    }
}
