use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// The signed-in user as resolved by the host's auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Fails fast with `Unauthorized` when there is no session.
pub fn require_user(session: Option<AuthUser>) -> AppResult<AuthUser> {
    match session {
        Some(user) => Ok(user),
        None => {
            tracing::warn!("Operation attempted without a session");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user_passes_session_through() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some("me@example.com".into()),
        };
        assert_eq!(require_user(Some(user.clone())).unwrap(), user);
    }

    #[test]
    fn test_require_user_without_session() {
        let err = require_user(None).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert_eq!(err.to_string(), "You must be logged in.");
        assert!(!err.is_recoverable_locally());
    }
}
