//! In-memory account store backing unit tests and `AppState::fake()`.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    entity::{Account, NewAccount},
    repo::{AccountRepository, RepoError, RepoResult, EMAIL_TAKEN},
};

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_all(&self) -> RepoResult<Vec<Account>> {
        let mut all: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        all.sort_by_key(|a| a.created_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Account> {
        self.accounts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Account> {
        self.accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, account: NewAccount) -> RepoResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(RepoError::Conflict(EMAIL_TAKEN.into()));
        }
        let account = account.into_account(OffsetDateTime::now_utc());
        if accounts.contains_key(&account.id) {
            return Err(RepoError::Conflict("id already exists".into()));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: &Account) -> RepoResult<Account> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.id) {
            return Err(RepoError::NotFound);
        }
        if accounts
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(RepoError::Conflict(EMAIL_TAKEN.into()));
        }
        accounts.insert(account.id, account.clone());
        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.accounts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            id: None,
            email: email.into(),
            password_hash: "hash".into(),
            first_name: "First".into(),
            last_name: "Last".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = InMemoryAccountRepository::new();
        repo.create(new_account("dup@x.com")).await.unwrap();
        let err = repo.create(new_account("dup@x.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_then_find_is_not_found() {
        let repo = InMemoryAccountRepository::new();
        let account = repo.create(new_account("gone@x.com")).await.unwrap();
        repo.delete(account.id).await.unwrap();
        assert!(matches!(
            repo.find_by_id(account.id).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.delete(account.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let repo = InMemoryAccountRepository::new();
        let ghost = new_account("ghost@x.com").into_account(OffsetDateTime::now_utc());
        assert!(matches!(repo.update(&ghost).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn update_to_taken_email_is_a_conflict() {
        let repo = InMemoryAccountRepository::new();
        repo.create(new_account("one@x.com")).await.unwrap();
        let mut two = repo.create(new_account("two@x.com")).await.unwrap();
        two.email = "one@x.com".into();
        assert!(matches!(
            repo.update(&two).await,
            Err(RepoError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn find_by_email_and_list() {
        let repo = InMemoryAccountRepository::new();
        let a = repo.create(new_account("a@x.com")).await.unwrap();
        repo.create(new_account("b@x.com")).await.unwrap();
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap().id, a.id);
        assert!(matches!(
            repo.find_by_email("nobody@x.com").await,
            Err(RepoError::NotFound)
        ));
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }
}
