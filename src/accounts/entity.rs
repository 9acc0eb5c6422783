use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Persisted account. Always carries its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Account that has not been stored yet. The repository assigns an id when none is given.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Option<Uuid>,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Field-level changes for an account. `None` leaves the field untouched.
/// The password is already hashed by the time it lands here.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

impl NewAccount {
    /// Materializes the account with server-side identity and timestamps.
    pub fn into_account(self, now: OffsetDateTime) -> Account {
        let now = truncate_to_micros(now);
        Account {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Account {
    pub fn apply(&mut self, changes: AccountChanges) {
        let AccountChanges {
            email,
            password_hash,
            first_name,
            last_name,
        } = changes;
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        if let Some(first) = first_name {
            self.first_name = first;
        }
        if let Some(last) = last_name {
            self.last_name = last;
        }
        self.touch();
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    // updated_at must strictly advance even when two mutations land in the same microsecond
    fn touch(&mut self) {
        let now = truncate_to_micros(OffsetDateTime::now_utc());
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Postgres stores microseconds; keep in-memory values comparable with stored ones.
pub fn truncate_to_micros(ts: OffsetDateTime) -> OffsetDateTime {
    ts - Duration::nanoseconds(i64::from(ts.nanosecond() % 1_000))
}
