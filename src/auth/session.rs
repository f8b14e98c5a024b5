//! Session state and navigation seams

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::models::{User, UserUpdate};
use crate::token::TokenStore;

/// Application routes a session operation can redirect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Admin,
}

/// Receives navigation side effects from session operations.
///
/// The web client navigates the browser; embedders plug in whatever their
/// view layer does, and tests plug in a recorder.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that ignores every redirect, the default
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}

/// Logical authentication state
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No valid session
    Unauthenticated,
    /// A persisted token is being verified against the backend
    Checking,
    /// Verified session for this user
    Authenticated(User),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Explicit session object, constructed once per client instance and shared
/// by reference with everything that needs the current user or token.
///
/// The in-memory token is authoritative; the token store only provides
/// persistence across instances.
pub struct SessionContext {
    state: RwLock<SessionState>,
    token: RwLock<Option<String>>,
    token_store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    persist: bool,
    user_provisional: AtomicBool,
}

impl SessionContext {
    pub fn new(token_store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>, persist: bool) -> Self {
        let token = token_store.load();
        Self {
            state: RwLock::new(SessionState::Unauthenticated),
            token: RwLock::new(token),
            token_store,
            navigator,
            persist,
            user_provisional: AtomicBool::new(false),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.read().map(|s| s.clone()).unwrap_or(SessionState::Unauthenticated)
    }

    /// The authenticated user, if any
    pub fn user(&self) -> Option<User> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// The bearer token for the current session
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Store a freshly issued token
    pub fn store_token(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
        if self.persist {
            self.token_store.save(token);
        }
    }

    pub(crate) fn set_checking(&self) {
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::Checking;
        }
    }

    /// Mark the session authenticated with an authoritative user copy
    pub fn set_authenticated(&self, user: User) {
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::Authenticated(user);
        }
        self.user_provisional.store(false, Ordering::SeqCst);
    }

    /// Drop the session: state and token, both in memory and persisted
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::Unauthenticated;
        }
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if self.persist {
            self.token_store.clear();
        }
        self.user_provisional.store(false, Ordering::SeqCst);
    }

    /// Shallow-merge a client-side patch into the cached user.
    ///
    /// No server round trip happens here; the copy is marked provisional
    /// until the next authoritative fetch reconciles it.
    pub fn update_user(&self, patch: UserUpdate) {
        let mut updated = false;
        if let Ok(mut state) = self.state.write() {
            if let SessionState::Authenticated(user) = &mut *state {
                if let Some(email) = patch.email {
                    user.email = email;
                }
                if let Some(first_name) = patch.first_name {
                    user.first_name = Some(first_name);
                }
                if let Some(last_name) = patch.last_name {
                    user.last_name = Some(last_name);
                }
                if let Some(avatar) = patch.avatar {
                    user.avatar = Some(avatar);
                }
                updated = true;
            }
        }
        if updated {
            self.user_provisional.store(true, Ordering::SeqCst);
        }
    }

    /// Whether the cached user carries unreconciled client-side changes
    pub fn user_is_provisional(&self) -> bool {
        self.user_provisional.load(Ordering::SeqCst)
    }

    /// Emit a navigation side effect
    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    pub(crate) fn navigator(&self) -> Arc<dyn Navigator> {
        self.navigator.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use serde_json::json;

    fn test_user() -> User {
        serde_json::from_value(json!({
            "id": "u1",
            "email": "a@b.com",
            "role": "member"
        }))
        .unwrap()
    }

    fn context() -> SessionContext {
        SessionContext::new(Arc::new(MemoryTokenStore::new()), Arc::new(NoopNavigator), true)
    }

    #[test]
    fn update_user_merges_and_marks_provisional() {
        let session = context();
        session.set_authenticated(test_user());
        assert!(!session.user_is_provisional());

        session.update_user(UserUpdate {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        });

        let user = session.user().unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.email, "a@b.com");
        assert!(session.user_is_provisional());

        // an authoritative copy reconciles the provisional flag
        session.set_authenticated(test_user());
        assert!(!session.user_is_provisional());
    }

    #[test]
    fn update_user_without_session_is_a_no_op() {
        let session = context();
        session.update_user(UserUpdate::default());
        assert!(!session.user_is_provisional());
        assert!(session.user().is_none());
    }

    #[test]
    fn clear_drops_token_and_state() {
        let store = Arc::new(MemoryTokenStore::with_token("tok1"));
        let session = SessionContext::new(store.clone(), Arc::new(NoopNavigator), true);
        assert_eq!(session.token(), Some("tok1".to_string()));

        session.set_authenticated(test_user());
        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(store.load(), None);
    }
}
