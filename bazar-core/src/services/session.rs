//! Session service - authentication state orchestration
//!
//! Wraps a [`SessionProvider`] and holds the in-memory authentication
//! state. Consumers that need to react to sign-in and sign-out (the
//! interactive flows, history cache) register an observer and receive
//! every state change until the returned [`Subscription`] is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::domain::result::Result;
use crate::domain::User;
use crate::ports::SessionProvider;

type Observer = Box<dyn Fn(Option<&User>) + Send>;
type ObserverMap = Mutex<HashMap<u64, Observer>>;

/// Service owning the current authentication state
pub struct SessionService {
    provider: Arc<dyn SessionProvider>,
    current: Mutex<Option<User>>,
    observers: Arc<ObserverMap>,
    next_observer_id: AtomicU64,
}

/// Handle for a registered session observer.
///
/// Dropping the handle unregisters the observer; no explicit
/// unsubscribe call exists.
pub struct Subscription {
    id: u64,
    observers: Weak<ObserverMap>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            if let Ok(mut map) = observers.lock() {
                map.remove(&self.id);
            }
        }
    }
}

impl SessionService {
    /// Create the service, restoring any persisted session
    pub fn new(provider: Arc<dyn SessionProvider>) -> Result<Self> {
        let current = provider.current_user()?;
        Ok(Self {
            provider,
            current: Mutex::new(current),
            observers: Arc::new(Mutex::new(HashMap::new())),
            next_observer_id: AtomicU64::new(1),
        })
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Register an observer for session state changes.
    ///
    /// The observer is invoked immediately with the current state, then
    /// on every subsequent change until the subscription is dropped.
    pub fn subscribe(&self, observer: impl Fn(Option<&User>) + Send + 'static) -> Subscription {
        observer(self.current_user().as_ref());

        let id = self.next_observer_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut map) = self.observers.lock() {
            map.insert(id, Box::new(observer));
        }
        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    pub fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<User> {
        let user = self.provider.sign_up(email, password, display_name)?;
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    /// Sign in with email and password. On failure the session state is
    /// left untouched and observers are not notified.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let user = self.provider.sign_in(email, password)?;
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_in_federated(&self) -> Result<User> {
        let user = self.provider.sign_in_federated()?;
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.provider.sign_out()?;
        self.set_current(None);
        Ok(())
    }

    fn set_current(&self, user: Option<User>) {
        if let Ok(mut guard) = self.current.lock() {
            *guard = user.clone();
        }
        if let Ok(map) = self.observers.lock() {
            for observer in map.values() {
                observer(user.as_ref());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::{Error, SessionError};

    /// Provider stub with a fixed credential pair
    struct StubProvider {
        fail: bool,
    }

    impl SessionProvider for StubProvider {
        fn current_user(&self) -> Result<Option<User>> {
            Ok(None)
        }

        fn sign_up(&self, email: &str, _password: &str, display_name: &str) -> Result<User> {
            if self.fail {
                return Err(SessionError::EmailAlreadyInUse.into());
            }
            Ok(User::new("u1", email).with_display_name(display_name))
        }

        fn sign_in(&self, email: &str, password: &str) -> Result<User> {
            if self.fail || password != "hunter22" {
                return Err(SessionError::InvalidCredentials.into());
            }
            Ok(User::new("u1", email))
        }

        fn sign_in_federated(&self) -> Result<User> {
            Err(SessionError::ProviderNotConfigured.into())
        }

        fn sign_out(&self) -> Result<()> {
            Ok(())
        }
    }

    fn service(fail: bool) -> SessionService {
        SessionService::new(Arc::new(StubProvider { fail })).unwrap()
    }

    #[test]
    fn test_sign_in_updates_state() {
        let service = service(false);
        assert!(!service.is_signed_in());

        let user = service.sign_in("a@b.c", "hunter22").unwrap();
        assert_eq!(service.current_user(), Some(user));

        service.sign_out().unwrap();
        assert!(service.current_user().is_none());
    }

    #[test]
    fn test_failed_sign_in_leaves_no_session() {
        let service = service(false);
        let result = service.sign_in("a@b.c", "wrong");
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::InvalidCredentials))
        ));
        assert!(service.current_user().is_none());
    }

    #[test]
    fn test_observers_see_every_change() {
        let service = service(false);
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _subscription = service.subscribe(move |user| {
            seen_clone
                .lock()
                .unwrap()
                .push(user.map(|u| u.email.clone()));
        });

        service.sign_in("a@b.c", "hunter22").unwrap();
        service.sign_out().unwrap();

        let seen = seen.lock().unwrap();
        // Immediate callback, then sign-in, then sign-out
        assert_eq!(
            *seen,
            vec![None, Some("a@b.c".to_string()), None]
        );
    }

    #[test]
    fn test_failed_sign_in_does_not_notify() {
        let service = service(true);
        let calls = Arc::new(Mutex::new(0usize));

        let calls_clone = calls.clone();
        let _subscription = service.subscribe(move |_| {
            *calls_clone.lock().unwrap() += 1;
        });

        let _ = service.sign_in("a@b.c", "hunter22");
        // Only the immediate callback fired
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let service = service(false);
        let calls = Arc::new(Mutex::new(0usize));

        let calls_clone = calls.clone();
        let subscription = service.subscribe(move |_| {
            *calls_clone.lock().unwrap() += 1;
        });
        drop(subscription);

        service.sign_in("a@b.c", "hunter22").unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
