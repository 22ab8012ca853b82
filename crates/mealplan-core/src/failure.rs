//! Classification of store errors the services report instead of
//! propagating.
//!
//! Only two kinds are recognised: write conflicts (lock timeouts,
//! serialization failures, deadlocks) and unique violations. Everything else
//! stays an `anyhow::Error` and goes back to the caller.

use thiserror::Error;

/// SQLSTATE codes treated as write conflicts.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// A store failure the service layer converts into a response status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreFailure {
    #[error("write conflict (sqlstate {code})")]
    Conflict { code: String },

    #[error("unique constraint {} violated", constraint.as_deref().unwrap_or("<unknown>"))]
    UniqueViolation { constraint: Option<String> },
}

impl StoreFailure {
    /// Inspect an error chain for a database error this layer handles.
    ///
    /// Returns `None` when the error should propagate unchanged.
    pub fn classify(err: &anyhow::Error) -> Option<Self> {
        let sqlx_err = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<sqlx::Error>())?;
        Self::from_sqlx(sqlx_err)
    }

    fn from_sqlx(err: &sqlx::Error) -> Option<Self> {
        let sqlx::Error::Database(db_err) = err else {
            return None;
        };
        if db_err.is_unique_violation() {
            return Some(Self::UniqueViolation {
                constraint: db_err.constraint().map(str::to_owned),
            });
        }
        let code = db_err.code()?.into_owned();
        if matches!(
            code.as_str(),
            SERIALIZATION_FAILURE | DEADLOCK_DETECTED | LOCK_NOT_AVAILABLE
        ) {
            Some(Self::Conflict { code })
        } else {
            None
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn non_database_errors_are_not_classified() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(StoreFailure::classify(&err), None);

        let err: anyhow::Error = Err::<(), _>(sqlx::Error::RowNotFound)
            .context("failed to fetch recipe")
            .unwrap_err();
        assert_eq!(StoreFailure::classify(&err), None);
    }

    #[test]
    fn display_names_the_cause() {
        let conflict = StoreFailure::Conflict {
            code: "40001".to_owned(),
        };
        assert_eq!(conflict.to_string(), "write conflict (sqlstate 40001)");
        assert!(conflict.is_conflict());

        let unique = StoreFailure::UniqueViolation {
            constraint: Some("recipe_ingredients_pair_key".to_owned()),
        };
        assert_eq!(
            unique.to_string(),
            "unique constraint recipe_ingredients_pair_key violated"
        );
        assert!(!unique.is_conflict());
    }
}
