//! Read-only query handlers. No side effects.

use std::sync::Arc;

use axum::extract::FromRef;
use tracing::instrument;
use uuid::Uuid;

use super::{entity::Account, repo::AccountRepository};
use crate::{errors::AppResult, state::AppState};

#[derive(Debug, Clone, Copy)]
pub struct GetAccountQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetAccountsQuery;

pub struct GetAccountHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl FromRef<AppState> for GetAccountHandler {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone())
    }
}

impl GetAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    #[instrument(skip(self), fields(account_id = %query.id))]
    pub async fn execute(&self, query: GetAccountQuery) -> AppResult<Account> {
        Ok(self.accounts.find_by_id(query.id).await?)
    }
}

pub struct GetAccountsHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl FromRef<AppState> for GetAccountsHandler {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone())
    }
}

impl GetAccountsHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    #[instrument(skip(self, _query))]
    pub async fn execute(&self, _query: GetAccountsQuery) -> AppResult<Vec<Account>> {
        Ok(self.accounts.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        accounts::{entity::NewAccount, memory::InMemoryAccountRepository},
        errors::AppError,
    };

    #[tokio::test]
    async fn reads_one_and_all() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let created = repo
            .create(NewAccount {
                id: None,
                email: "a@x.com".into(),
                password_hash: "h".into(),
                first_name: "A".into(),
                last_name: "B".into(),
            })
            .await
            .unwrap();

        let one = GetAccountHandler::new(repo.clone())
            .execute(GetAccountQuery { id: created.id })
            .await
            .unwrap();
        assert_eq!(one, created);

        let all = GetAccountsHandler::new(repo.clone())
            .execute(GetAccountsQuery)
            .await
            .unwrap();
        assert_eq!(all, vec![created]);

        let missing = GetAccountHandler::new(repo)
            .execute(GetAccountQuery { id: Uuid::new_v4() })
            .await;
        assert!(matches!(missing, Err(AppError::NotFound)));
    }
}
