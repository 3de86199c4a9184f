use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};

use crate::{
    auth::{claims::Session, jwt::JwtService},
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedOut { user_id: String },
}

/// The boundary to whoever issues and revokes user sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_session(&self, token: &str) -> AppResult<Session>;

    async fn sign_out(&self, token: &str) -> AppResult<()>;

    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}

/// Accepts bearer tokens signed with the shared secret. Signed-out tokens are remembered
/// until they would have expired anyway.
pub struct JwtIdentityProvider {
    jwt: JwtService,
    revoked: RwLock<HashMap<String, usize>>,
    changes: broadcast::Sender<SessionChange>,
}

impl JwtIdentityProvider {
    pub fn new(jwt: JwtService) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            jwt,
            revoked: RwLock::new(HashMap::new()),
            changes,
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn current_session(&self, token: &str) -> AppResult<Session> {
        if self.revoked.read().await.contains_key(token) {
            return Err(AppError::Unauthorized("Session has ended".to_string()));
        }

        let claims = self.jwt.validate_token(token)?;
        Ok(Session::from(&claims))
    }

    async fn sign_out(&self, token: &str) -> AppResult<()> {
        let claims = self.jwt.validate_token(token)?;

        let mut revoked = self.revoked.write().await;
        let now = Utc::now().timestamp() as usize;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(token.to_string(), claims.exp);
        drop(revoked);

        log::info!("User {} signed out", claims.sub);
        // nobody listening is fine
        let _ = self.changes.send(SessionChange::SignedOut {
            user_id: claims.sub,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn provider() -> JwtIdentityProvider {
        let config = Config::test_config();
        JwtIdentityProvider::new(JwtService::new(&config.jwt_secret, 1))
    }

    #[actix_rt::test]
    async fn valid_token_yields_session() {
        let provider = provider();
        let token = provider.jwt().create_token("user-1", "a@example.com").unwrap();

        let session = provider.current_session(&token).await.unwrap();
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.email, "a@example.com");
    }

    #[actix_rt::test]
    async fn sign_out_revokes_token_and_notifies() {
        let provider = provider();
        let token = provider.jwt().create_token("user-1", "a@example.com").unwrap();
        let mut changes = provider.subscribe();

        provider.sign_out(&token).await.unwrap();

        assert!(matches!(
            provider.current_session(&token).await,
            Err(AppError::Unauthorized(_))
        ));
        assert_eq!(
            changes.recv().await.unwrap(),
            SessionChange::SignedOut {
                user_id: "user-1".to_string()
            }
        );
    }

    #[actix_rt::test]
    async fn sign_out_requires_valid_token() {
        let provider = provider();
        assert!(provider.sign_out("garbage").await.is_err());
    }
}
