use crate::{
    auth::Session,
    errors::{AppError, AppResult},
};

/// Quiz attempts are private to whoever started them. Others get a not-found, not a hint that
/// the attempt exists.
pub fn require_owner(session: &Session, resource_owner: &str) -> AppResult<()> {
    if session.user_id != resource_owner {
        return Err(AppError::NotFound("quiz attempt".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_owner_as_owner() {
        let session = create_test_session("john");
        assert!(require_owner(&session, "john").is_ok());
    }

    #[test]
    fn test_require_owner_failure() {
        let session = create_test_session("john");
        assert!(matches!(
            require_owner(&session, "jane"),
            Err(AppError::NotFound(_))
        ));
    }
}
