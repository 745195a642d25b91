//! Remote document store / identity provider client
//!
//! Handles communication with the hosted Bazar backend: an identity
//! service (sign-up, sign-in, federated sign-in, sign-out) and a
//! per-user list document store. Failures are mapped onto the
//! classified [`SessionError`] / [`StoreError`] reasons; callers turn
//! those into user-facing messages.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::adapters::session_file;
use crate::domain::result::{Error, Result, SessionError, StoreError};
use crate::domain::{List, User};
use crate::ports::{ListStore, SessionProvider};

/// Environment variable to override the remote API base URL.
/// Set this to use a staging/sandbox environment for testing.
pub const REMOTE_BASE_URL_ENV: &str = "BAZAR_REMOTE_URL";

const REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// API Response Models
// =============================================================================

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteUser {
    id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<RemoteUser> for User {
    fn from(remote: RemoteUser) -> Self {
        let mut user = User::new(remote.id, remote.email);
        user.display_name = remote.display_name;
        user
    }
}

#[derive(Debug, Deserialize)]
struct ListsResponse {
    lists: Vec<List>,
    #[allow(dead_code)]
    total: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Blocking HTTP client for the Bazar backend
#[derive(Debug)]
pub struct RemoteClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RemoteClient {
    /// Create a new client with a custom base URL.
    ///
    /// The `BAZAR_REMOTE_URL` env var takes precedence over the
    /// configured URL so tests and staging can redirect traffic.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("remote API key cannot be empty".to_string()));
        }

        let base_url = std::env::var(REMOTE_BASE_URL_ENV).unwrap_or_else(|_| base_url.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Other(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // === Identity endpoints ===

    fn auth_request(&self, path: &str, body: serde_json::Value) -> Result<(User, String)> {
        let url = format!("{}/auth/{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(map_session_transport_error)?;

        if !response.status().is_success() {
            return Err(session_error_from_response(response).into());
        }

        let auth: AuthResponse = response
            .json()
            .map_err(|e| Error::Other(format!("failed to parse auth response: {}", e)))?;
        Ok((auth.user.into(), auth.token))
    }

    pub fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<(User, String)> {
        self.auth_request(
            "signup",
            serde_json::json!({
                "email": email,
                "password": password,
                "displayName": display_name,
            }),
        )
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<(User, String)> {
        self.auth_request(
            "signin",
            serde_json::json!({ "email": email, "password": password }),
        )
    }

    pub fn sign_in_federated(&self) -> Result<(User, String)> {
        self.auth_request("federated", serde_json::json!({}))
    }

    pub fn sign_out(&self, token: &str) -> Result<()> {
        let url = format!("{}/auth/signout", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("x-session-token", token)
            .send()
            .map_err(map_session_transport_error)?;

        if !response.status().is_success() {
            return Err(session_error_from_response(response).into());
        }
        Ok(())
    }

    // === Document store endpoints ===

    pub fn get_lists(&self, user_id: &str, token: Option<&str>) -> Result<Vec<List>> {
        let url = format!("{}/lists?userId={}", self.base_url, user_id);
        let response = self
            .store_headers(self.client.get(&url), token)
            .send()
            .map_err(map_store_transport_error)?;

        check_store_status(&response)?;

        let lists: ListsResponse = response
            .json()
            .map_err(|e| Error::Other(format!("failed to parse lists response: {}", e)))?;
        Ok(lists.lists)
    }

    pub fn put_list(&self, list: &List, token: Option<&str>) -> Result<()> {
        let url = format!("{}/lists/{}", self.base_url, list.id);
        let response = self
            .store_headers(self.client.put(&url), token)
            .json(list)
            .send()
            .map_err(map_store_transport_error)?;

        check_store_status(&response)
    }

    pub fn delete_lists(&self, user_id: &str, token: Option<&str>) -> Result<()> {
        let url = format!("{}/lists?userId={}", self.base_url, user_id);
        let response = self
            .store_headers(self.client.delete(&url), token)
            .send()
            .map_err(map_store_transport_error)?;

        check_store_status(&response)
    }

    fn store_headers(
        &self,
        builder: reqwest::blocking::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::blocking::RequestBuilder {
        let builder = builder.header("x-api-key", &self.api_key);
        match token {
            Some(token) => builder.header("x-session-token", token),
            None => builder,
        }
    }
}

/// Map a transport-level failure on an identity call
fn map_session_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() || error.is_connect() {
        SessionError::Other("network-unavailable".to_string()).into()
    } else {
        SessionError::Other(format!("request-failed: {}", error)).into()
    }
}

/// Map a transport-level failure on a store call
fn map_store_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() || error.is_connect() {
        StoreError::Unavailable.into()
    } else {
        StoreError::Other(error.to_string()).into()
    }
}

/// Extract the classified reason from a failed identity response.
/// The backend reports `{"error": "<code>"}`; fall back to the HTTP
/// status when the body is not parseable.
fn session_error_from_response(response: Response) -> SessionError {
    let status = response.status().as_u16();
    if let Ok(body) = response.json::<ErrorBody>() {
        return SessionError::from_code(&body.error);
    }
    match status {
        401 => SessionError::InvalidCredentials,
        409 => SessionError::EmailAlreadyInUse,
        503 => SessionError::ProviderNotConfigured,
        other => SessionError::Other(format!("http-{}", other)),
    }
}

/// Check a store response status and map failures
fn check_store_status(response: &Response) -> Result<()> {
    match response.status().as_u16() {
        200..=299 => Ok(()),
        401 | 403 => Err(StoreError::PermissionDenied.into()),
        408 | 429 | 500..=599 => Err(StoreError::Unavailable.into()),
        other => Err(StoreError::Other(format!("HTTP {}", other)).into()),
    }
}

// =============================================================================
// Port implementations
// =============================================================================

/// Session provider backed by the remote identity service
pub struct RemoteSessionProvider {
    client: Arc<RemoteClient>,
    session_path: PathBuf,
}

impl RemoteSessionProvider {
    pub fn new(client: Arc<RemoteClient>, bazar_dir: &Path) -> Self {
        Self {
            client,
            session_path: session_file::path(bazar_dir),
        }
    }

    fn persist(&self, user: &User, token: String) -> Result<()> {
        session_file::write_with_token(&self.session_path, user, Some(token))
    }
}

impl SessionProvider for RemoteSessionProvider {
    fn current_user(&self) -> Result<Option<User>> {
        session_file::read(&self.session_path)
    }

    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<User> {
        let (user, token) = self.client.sign_up(email, password, display_name)?;
        self.persist(&user, token)?;
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let (user, token) = self.client.sign_in(email, password)?;
        self.persist(&user, token)?;
        Ok(user)
    }

    fn sign_in_federated(&self) -> Result<User> {
        let (user, token) = self.client.sign_in_federated()?;
        self.persist(&user, token)?;
        Ok(user)
    }

    fn sign_out(&self) -> Result<()> {
        if let Some((_, Some(token))) = session_file::read_with_token(&self.session_path)? {
            self.client.sign_out(&token)?;
        }
        session_file::remove(&self.session_path)
    }
}

/// List store backed by the remote document store
pub struct RemoteListStore {
    client: Arc<RemoteClient>,
    session_path: PathBuf,
}

impl RemoteListStore {
    pub fn new(client: Arc<RemoteClient>, bazar_dir: &Path) -> Self {
        Self {
            client,
            session_path: session_file::path(bazar_dir),
        }
    }

    fn token(&self) -> Option<String> {
        session_file::read_with_token(&self.session_path)
            .ok()
            .flatten()
            .and_then(|(_, token)| token)
    }
}

impl ListStore for RemoteListStore {
    fn list_all(&self, user_id: &str) -> Result<Vec<List>> {
        self.client.get_lists(user_id, self.token().as_deref())
    }

    fn put(&self, list: &List) -> Result<()> {
        self.client.put_list(list, self.token().as_deref())
    }

    fn delete_all(&self, user_id: &str) -> Result<()> {
        self.client.delete_lists(user_id, self.token().as_deref())
    }
}
