use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument, warn};

use super::{
    jwt::JwtKeys,
    password::{verify_against_dummy, verify_password},
};
use crate::{
    accounts::repo::{AccountRepository, RepoError},
    errors::{AppError, AppResult},
    state::AppState,
};

/// Signed token handed back to the client.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Validates credentials and issues access tokens.
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone(), JwtKeys::from_ref(state))
    }
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, keys: JwtKeys) -> Self {
        Self { accounts, keys }
    }

    /// Unknown email, wrong password and deactivated account all yield the same `Unauthorized`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        let account = match self.accounts.find_by_email(email).await {
            Ok(account) => account,
            Err(RepoError::NotFound) => {
                verify_against_dummy(password);
                warn!("login unknown email");
                return Err(AppError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password, &account.password_hash)? {
            warn!(account_id = %account.id, "login invalid password");
            return Err(AppError::Unauthorized);
        }

        if !account.is_active {
            warn!(account_id = %account.id, "login on deactivated account");
            return Err(AppError::Unauthorized);
        }

        let token = self.keys.sign(account.id, &account.email)?;
        info!(account_id = %account.id, "account logged in");
        Ok(IssuedToken {
            token,
            expires_in: self.keys.ttl.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        accounts::{entity::NewAccount, memory::InMemoryAccountRepository},
        auth::password::hash_password,
        config::JwtConfig,
    };
    use std::time::Duration;

    async fn service_with_account(active: bool) -> AuthService {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mut account = repo
            .create(NewAccount {
                id: None,
                email: "a@x.com".into(),
                password_hash: hash_password("longenough").unwrap(),
                first_name: "A".into(),
                last_name: "B".into(),
            })
            .await
            .unwrap();
        if !active {
            account.deactivate();
            repo.update(&account).await.unwrap();
        }
        let keys = JwtKeys::from(&JwtConfig {
            secret: "test".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl: Duration::from_secs(60),
        });
        AuthService::new(repo, keys)
    }

    #[tokio::test]
    async fn correct_credentials_issue_token() {
        let service = service_with_account(true).await;
        let issued = service.login("a@x.com", "longenough").await.unwrap();
        assert_eq!(issued.expires_in, 60);
        let claims = service.keys.verify(&issued.token).unwrap();
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_both_unauthorized() {
        let service = service_with_account(true).await;
        assert!(matches!(
            service.login("a@x.com", "wrong-password").await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            service.login("nobody@x.com", "longenough").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn deactivated_account_cannot_login() {
        let service = service_with_account(false).await;
        assert!(matches!(
            service.login("a@x.com", "longenough").await,
            Err(AppError::Unauthorized)
        ));
    }
}
