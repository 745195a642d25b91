//! Local session provider
//!
//! Implements the [`SessionProvider`] port against the local DuckDB
//! credential table. Passwords are hashed with Argon2; the active
//! session is persisted to `session.json` in the bazar directory so it
//! survives across invocations, matching the remote provider's
//! behavior. There is no federated flow locally.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use uuid::Uuid;

use crate::adapters::duckdb::{DuckDbStore, UserRecord};
use crate::adapters::session_file;
use crate::domain::result::{Error, Result, SessionError};
use crate::domain::User;
use crate::ports::SessionProvider;

/// Minimum accepted password length, matching the remote provider's
/// weak-password rule
const MIN_PASSWORD_LEN: usize = 6;

/// Session provider backed by the local credential table
pub struct LocalSessionProvider {
    store: Arc<DuckDbStore>,
    session_path: PathBuf,
}

impl LocalSessionProvider {
    pub fn new(store: Arc<DuckDbStore>, bazar_dir: &Path) -> Self {
        Self {
            store,
            session_path: session_file::path(bazar_dir),
        }
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Other(format!("password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl SessionProvider for LocalSessionProvider {
    fn current_user(&self) -> Result<Option<User>> {
        session_file::read(&self.session_path)
    }

    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::validation("invalid email address"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(SessionError::WeakPassword.into());
        }
        if self.store.get_user_by_email(email)?.is_some() {
            return Err(SessionError::EmailAlreadyInUse.into());
        }

        let record = UserRecord {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: Some(display_name.trim().to_string()).filter(|s| !s.is_empty()),
            password_hash: Self::hash_password(password)?,
        };
        self.store.insert_user(&record)?;

        let mut user = User::new(record.user_id, record.email);
        user.display_name = record.display_name;
        session_file::write(&self.session_path, &user)?;
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let record = self
            .store
            .get_user_by_email(email.trim())?
            .ok_or(SessionError::InvalidCredentials)?;

        if !Self::verify_password(password, &record.password_hash) {
            return Err(SessionError::InvalidCredentials.into());
        }

        let mut user = User::new(record.user_id, record.email);
        user.display_name = record.display_name;
        session_file::write(&self.session_path, &user)?;
        Ok(user)
    }

    fn sign_in_federated(&self) -> Result<User> {
        Err(SessionError::ProviderNotConfigured.into())
    }

    fn sign_out(&self) -> Result<()> {
        session_file::remove(&self.session_path)
    }
}
