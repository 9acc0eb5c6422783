use async_trait::async_trait;
use uuid::Uuid;

use super::entity::{Account, NewAccount};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage port for accounts. Every call is a single round-trip to the store.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Account>>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Account>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Account>;
    /// Stores a new account. Duplicate emails yield [`RepoError::Conflict`].
    async fn create(&self, account: NewAccount) -> RepoResult<Account>;
    /// Overwrites the stored account with the same id.
    async fn update(&self, account: &Account) -> RepoResult<Account>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

pub(crate) const EMAIL_TAKEN: &str = "email already registered";
