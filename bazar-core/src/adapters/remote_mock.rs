//! Mock Bazar backend for testing
//!
//! This module provides a mock HTTP server that simulates the hosted
//! Bazar backend, allowing for comprehensive testing without a real
//! account.
//!
//! The mock server implements the same response structure as the real API:
//! - POST /auth/signup|signin|federated returns { token, user: {...} }
//! - GET /lists?userId=X returns { lists: [...], total: N }
//! - PUT /lists/{id} upserts a whole list document
//! - DELETE /lists?userId=X removes every list for the user

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde::Deserialize;
use serde_json::json;

/// Mock backend server for testing
pub struct MockBazarServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether every identity call fails with invalid credentials
    pub fail_auth: bool,
    /// Whether federated sign-in reports the user closed the popup
    pub cancel_federated: bool,
    /// Whether store writes are rejected with a permission error
    pub deny_writes: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

#[derive(Debug, Default)]
struct MockState {
    /// email -> (user_id, password, display_name)
    users: HashMap<String, (String, String, Option<String>)>,
    /// list_id -> (user_id, whole list document)
    lists: HashMap<String, (String, serde_json::Value)>,
    next_user_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl MockBazarServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let state = Arc::new(Mutex::new(MockState::default()));

        // Set listener to non-blocking for graceful shutdown
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let state = state.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &state);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        // No connection available, sleep briefly
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBazarServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, state: &Mutex<MockState>) {
    let mut buffer = [0; 8192];

    let n = match stream.read(&mut buffer) {
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buffer[..n]).to_string();

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "bad-request"}"#);
        return;
    }

    let method = parts[0];
    let path = parts[1];
    let path_without_query = path.split('?').next().unwrap_or(path);
    let body = request.split("\r\n\r\n").nth(1).unwrap_or("");

    // Check x-api-key header (case-insensitive)
    let request_lower = request.to_lowercase();
    let has_valid_key = request_lower.contains("x-api-key: test_")
        || request_lower.contains("x-api-key: mock_")
        || request_lower.contains("x-api-key: valid_");
    if !has_valid_key {
        send_response(&mut stream, 401, "Unauthorized", r#"{"error": "invalid-api-key"}"#);
        return;
    }

    if path_without_query.starts_with("/auth/") {
        handle_auth(&mut stream, method, path_without_query, body, config, state);
    } else if path_without_query == "/lists" || path_without_query.starts_with("/lists/") {
        handle_lists(&mut stream, method, path, body, config, state);
    } else {
        send_response(&mut stream, 404, "Not Found", r#"{"error": "not-found"}"#);
    }
}

fn handle_auth(
    stream: &mut TcpStream,
    method: &str,
    path: &str,
    body: &str,
    config: &MockConfig,
    state: &Mutex<MockState>,
) {
    if method != "POST" {
        send_response(stream, 405, "Method Not Allowed", r#"{"error": "method-not-allowed"}"#);
        return;
    }

    if path == "/auth/signout" {
        send_response(stream, 200, "OK", "{}");
        return;
    }

    if config.fail_auth {
        send_response(stream, 401, "Unauthorized", r#"{"error": "invalid-credential"}"#);
        return;
    }

    let auth: AuthBody = serde_json::from_str(body).unwrap_or(AuthBody {
        email: String::new(),
        password: String::new(),
        display_name: None,
    });
    let mut state = state.lock().unwrap();

    match path {
        "/auth/signup" => {
            if auth.password.len() < 6 {
                send_response(stream, 422, "Unprocessable Entity", r#"{"error": "weak-password"}"#);
                return;
            }
            if state.users.contains_key(&auth.email) {
                send_response(stream, 409, "Conflict", r#"{"error": "email-already-in-use"}"#);
                return;
            }
            state.next_user_id += 1;
            let user_id = format!("user_{}", state.next_user_id);
            state.users.insert(
                auth.email.clone(),
                (user_id.clone(), auth.password, auth.display_name.clone()),
            );
            send_auth_success(stream, &user_id, &auth.email, auth.display_name.as_deref());
        }
        "/auth/signin" => match state.users.get(&auth.email) {
            Some((user_id, password, display_name)) if *password == auth.password => {
                send_auth_success(stream, user_id, &auth.email, display_name.as_deref());
            }
            _ => {
                send_response(stream, 401, "Unauthorized", r#"{"error": "invalid-credential"}"#);
            }
        },
        "/auth/federated" => {
            if config.cancel_federated {
                send_response(stream, 401, "Unauthorized", r#"{"error": "popup-closed-by-user"}"#);
                return;
            }
            let email = "federated@example.com".to_string();
            let user_id = match state.users.get(&email) {
                Some((id, _, _)) => id.clone(),
                None => {
                    state.next_user_id += 1;
                    let id = format!("user_{}", state.next_user_id);
                    state
                        .users
                        .insert(email.clone(), (id.clone(), String::new(), None));
                    id
                }
            };
            send_auth_success(stream, &user_id, &email, Some("Federated User"));
        }
        _ => {
            send_response(stream, 404, "Not Found", r#"{"error": "not-found"}"#);
        }
    }
}

fn handle_lists(
    stream: &mut TcpStream,
    method: &str,
    path: &str,
    body: &str,
    config: &MockConfig,
    state: &Mutex<MockState>,
) {
    let user_id = path
        .split('?')
        .nth(1)
        .and_then(|query| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("userId="))
        })
        .unwrap_or("")
        .to_string();

    let mut state = state.lock().unwrap();

    match method {
        "GET" => {
            let lists: Vec<&serde_json::Value> = state
                .lists
                .values()
                .filter(|(owner, _)| *owner == user_id)
                .map(|(_, doc)| doc)
                .collect();
            let json = json!({ "lists": lists, "total": lists.len() }).to_string();
            send_response(stream, 200, "OK", &json);
        }
        "PUT" => {
            if config.deny_writes {
                send_response(stream, 403, "Forbidden", r#"{"error": "permission-denied"}"#);
                return;
            }
            let doc: serde_json::Value = match serde_json::from_str(body) {
                Ok(doc) => doc,
                Err(_) => {
                    send_response(stream, 400, "Bad Request", r#"{"error": "bad-request"}"#);
                    return;
                }
            };
            let list_id = doc["id"].as_str().unwrap_or_default().to_string();
            let owner = doc["userId"].as_str().unwrap_or_default().to_string();
            state.lists.insert(list_id, (owner, doc));
            send_response(stream, 200, "OK", "{}");
        }
        "DELETE" => {
            if config.deny_writes {
                send_response(stream, 403, "Forbidden", r#"{"error": "permission-denied"}"#);
                return;
            }
            state.lists.retain(|_, (owner, _)| *owner != user_id);
            send_response(stream, 200, "OK", "{}");
        }
        _ => {
            send_response(stream, 405, "Method Not Allowed", r#"{"error": "method-not-allowed"}"#);
        }
    }
}

fn send_auth_success(stream: &mut TcpStream, user_id: &str, email: &str, display_name: Option<&str>) {
    let body = json!({
        "token": format!("tok_{}", user_id),
        "user": {
            "id": user_id,
            "email": email,
            "displayName": display_name,
        },
    })
    .to_string();
    send_response(stream, 200, "OK", &body);
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::remote::{RemoteClient, RemoteListStore, RemoteSessionProvider};
    use crate::domain::result::{Error, SessionError, StoreError};
    use crate::domain::{Item, List, Unit, User};
    use crate::ports::{ListStore, SessionProvider};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn client_for(server: &MockBazarServer) -> Arc<RemoteClient> {
        Arc::new(RemoteClient::new("test_key", &server.base_url()).unwrap())
    }

    #[test]
    fn test_signup_and_signin() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = client_for(&server);

        let (user, token) = client.sign_up("a@b.c", "hunter22", "Alice").unwrap();
        assert_eq!(user.email, "a@b.c");
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert!(!token.is_empty());

        let (again, _) = client.sign_in("a@b.c", "hunter22").unwrap();
        assert_eq!(again.id, user.id);
    }

    #[test]
    fn test_signin_wrong_password() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = client_for(&server);

        client.sign_up("a@b.c", "hunter22", "Alice").unwrap();
        let result = client.sign_in("a@b.c", "wrong");
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::InvalidCredentials))
        ));
    }

    #[test]
    fn test_signup_duplicate_email() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = client_for(&server);

        client.sign_up("a@b.c", "hunter22", "Alice").unwrap();
        let result = client.sign_up("a@b.c", "hunter23", "Bob");
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::EmailAlreadyInUse))
        ));
    }

    #[test]
    fn test_signup_weak_password() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = client_for(&server);

        let result = client.sign_up("a@b.c", "pw", "Alice");
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::WeakPassword))
        ));
    }

    #[test]
    fn test_auth_failure_config() {
        let server = MockBazarServer::start(MockConfig {
            fail_auth: true,
            ..Default::default()
        })
        .unwrap();
        let client = client_for(&server);

        let result = client.sign_in("a@b.c", "hunter22");
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::InvalidCredentials))
        ));
    }

    #[test]
    fn test_put_and_list_round_trip() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = client_for(&server);

        let user = User::new("user_1", "a@b.c");
        let mut item = Item::new("Rice", Decimal::new(2, 0), Unit::Kg);
        item.check(Decimal::new(350, 2));
        let list = List::new(
            "Weekly shop",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            &user,
            vec![item],
        );

        client.put_list(&list, None).unwrap();
        let lists = client.get_lists("user_1", None).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, list.id);
        assert_eq!(lists[0].items.len(), 1);

        // Upsert keyed on id: writing again does not duplicate
        client.put_list(&list, None).unwrap();
        assert_eq!(client.get_lists("user_1", None).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_all_only_affects_one_user() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = client_for(&server);

        let alice = User::new("user_1", "a@b.c");
        let bob = User::new("user_2", "b@b.c");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        client
            .put_list(&List::new("A", date, &alice, vec![]), None)
            .unwrap();
        client
            .put_list(&List::new("B", date, &bob, vec![]), None)
            .unwrap();

        client.delete_lists("user_1", None).unwrap();
        assert!(client.get_lists("user_1", None).unwrap().is_empty());
        assert_eq!(client.get_lists("user_2", None).unwrap().len(), 1);
    }

    #[test]
    fn test_denied_writes_map_to_permission_error() {
        let server = MockBazarServer::start(MockConfig {
            deny_writes: true,
            ..Default::default()
        })
        .unwrap();
        let client = client_for(&server);

        let user = User::new("user_1", "a@b.c");
        let list = List::new(
            "A",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            &user,
            vec![],
        );
        let result = client.put_list(&list, None);
        assert!(matches!(
            result,
            Err(Error::Store(StoreError::PermissionDenied))
        ));

        let result = client.delete_lists("user_1", None);
        assert!(matches!(
            result,
            Err(Error::Store(StoreError::PermissionDenied))
        ));
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let client = RemoteClient::new("bogus", &server.base_url()).unwrap();

        let result = client.get_lists("user_1", None);
        assert!(matches!(
            result,
            Err(Error::Store(StoreError::PermissionDenied))
        ));
    }

    #[test]
    fn test_session_provider_persists_token() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let dir = tempdir().unwrap();
        let provider = RemoteSessionProvider::new(client_for(&server), dir.path());

        assert!(provider.current_user().unwrap().is_none());

        let user = provider.sign_up("a@b.c", "hunter22", "Alice").unwrap();
        assert_eq!(provider.current_user().unwrap(), Some(user.clone()));

        // The stored token authorizes the list store
        let store = RemoteListStore::new(client_for(&server), dir.path());
        let list = List::new(
            "A",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            &user,
            vec![],
        );
        store.put(&list).unwrap();
        assert_eq!(store.list_all(&user.id).unwrap().len(), 1);

        provider.sign_out().unwrap();
        assert!(provider.current_user().unwrap().is_none());
    }

    #[test]
    fn test_cancelled_federated_sign_in_leaves_no_session() {
        let server = MockBazarServer::start(MockConfig {
            cancel_federated: true,
            ..Default::default()
        })
        .unwrap();
        let dir = tempdir().unwrap();
        let provider = RemoteSessionProvider::new(client_for(&server), dir.path());

        let result = provider.sign_in_federated();
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::PopupClosed))
        ));
        assert!(provider.current_user().unwrap().is_none());
    }

    #[test]
    fn test_federated_sign_in() {
        let server = MockBazarServer::start(MockConfig::default()).unwrap();
        let dir = tempdir().unwrap();
        let provider = RemoteSessionProvider::new(client_for(&server), dir.path());

        let user = provider.sign_in_federated().unwrap();
        assert_eq!(user.email, "federated@example.com");
        assert!(provider.current_user().unwrap().is_some());
    }
}
