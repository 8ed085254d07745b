use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use super::record_store::RecordStore;
use crate::models::user::{Role, UserRecord};

pub const USERS_COLLECTION: &str = "users";

pub struct UserService<'a> {
    store: &'a RecordStore,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.store
            .load_or_default::<UserRecord>(USERS_COLLECTION)
            .into_iter()
            .find(|user| user.username == username)
    }

    pub fn find_by_id(&self, user_id: &str) -> Option<UserRecord> {
        self.store
            .load_or_default::<UserRecord>(USERS_COLLECTION)
            .into_iter()
            .find(|user| user.id == user_id)
    }

    /// Creates the account; the caller checks for username collisions first.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> Result<UserRecord> {
        let password_hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).context("failed to hash password")?;

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let mut users: Vec<UserRecord> = self.store.load_or_default(USERS_COLLECTION);
        users.push(user.clone());
        self.store
            .save(USERS_COLLECTION, &users)
            .context("failed to persist user")?;

        tracing::info!("Registered user {} as {:?}", username, role);
        Ok(user)
    }

    pub fn verify_password(&self, user: &UserRecord, password: &str) -> bool {
        bcrypt::verify(password, &user.password_hash).unwrap_or(false)
    }
}
