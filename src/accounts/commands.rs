//! Command handlers for accounts.
//!
//! Each handler performs one repository write and, for create and update,
//! one notification.

use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    entity::{Account, AccountChanges, NewAccount},
    repo::AccountRepository,
};
use crate::{
    auth::password::hash_password,
    config::NotificationPolicy,
    errors::AppResult,
    notifications::{NotificationError, Notifier},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateAccountCommand {
    pub id: Uuid,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteAccountCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub struct SetAccountActiveCommand {
    pub id: Uuid,
    pub active: bool,
}

fn settle_notification(
    policy: NotificationPolicy,
    result: Result<(), NotificationError>,
) -> Result<(), NotificationError> {
    match (result, policy) {
        (Ok(()), _) => Ok(()),
        (Err(e), NotificationPolicy::BestEffort) => {
            warn!(error = %e, "notification failed; continuing");
            Ok(())
        }
        (Err(e), NotificationPolicy::Strict) => Err(e),
    }
}

// =========================================================================
// Create
// =========================================================================

pub struct CreateAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn Notifier>,
    policy: NotificationPolicy,
}

impl FromRef<AppState> for CreateAccountHandler {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.accounts.clone(),
            state.notifier.clone(),
            state.config.email.policy,
        )
    }
}

impl CreateAccountHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn Notifier>,
        policy: NotificationPolicy,
    ) -> Self {
        Self {
            accounts,
            notifier,
            policy,
        }
    }

    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn execute(&self, command: CreateAccountCommand) -> AppResult<Account> {
        let password_hash = hash_password(&command.password)?;
        let account = self
            .accounts
            .create(NewAccount {
                id: None,
                email: command.email,
                password_hash,
                first_name: command.first_name,
                last_name: command.last_name,
            })
            .await?;
        info!(account_id = %account.id, "account created");

        settle_notification(
            self.policy,
            self.notifier.send_account_created(&account).await,
        )?;
        Ok(account)
    }
}

// =========================================================================
// Update
// =========================================================================

pub struct UpdateAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn Notifier>,
    policy: NotificationPolicy,
}

impl FromRef<AppState> for UpdateAccountHandler {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.accounts.clone(),
            state.notifier.clone(),
            state.config.email.policy,
        )
    }
}

impl UpdateAccountHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn Notifier>,
        policy: NotificationPolicy,
    ) -> Self {
        Self {
            accounts,
            notifier,
            policy,
        }
    }

    #[instrument(skip(self, command), fields(account_id = %command.id))]
    pub async fn execute(&self, command: UpdateAccountCommand) -> AppResult<Account> {
        let mut account = self.accounts.find_by_id(command.id).await?;

        let password_hash = match command.password.as_deref() {
            Some(plain) => Some(hash_password(plain)?),
            None => None,
        };
        let changes = AccountChanges {
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
        };
        if changes.is_empty() {
            debug!("no field changes; only updated_at advances");
        }
        account.apply(changes);

        let account = self.accounts.update(&account).await?;
        info!("account updated");

        settle_notification(
            self.policy,
            self.notifier.send_account_updated(&account).await,
        )?;
        Ok(account)
    }
}

// =========================================================================
// Delete
// =========================================================================

pub struct DeleteAccountHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl FromRef<AppState> for DeleteAccountHandler {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone())
    }
}

impl DeleteAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    #[instrument(skip(self), fields(account_id = %command.id))]
    pub async fn execute(&self, command: DeleteAccountCommand) -> AppResult<()> {
        self.accounts.find_by_id(command.id).await?;
        self.accounts.delete(command.id).await?;
        info!("account deleted");
        Ok(())
    }
}

// =========================================================================
// Activate / deactivate
// =========================================================================

pub struct SetAccountActiveHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl FromRef<AppState> for SetAccountActiveHandler {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone())
    }
}

impl SetAccountActiveHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    #[instrument(skip(self), fields(account_id = %command.id, active = command.active))]
    pub async fn execute(&self, command: SetAccountActiveCommand) -> AppResult<Account> {
        let mut account = self.accounts.find_by_id(command.id).await?;
        if command.active {
            account.activate();
        } else {
            account.deactivate();
        }
        let account = self.accounts.update(&account).await?;
        info!("account activation changed");
        Ok(account)
    }
}
