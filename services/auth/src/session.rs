//! Session management backed by a key-value store
//!
//! [`SessionManager`] owns the current session and the loading flag, applies
//! the pure transitions from [`crate::transition`], persists the result, and
//! reports outcomes through a [`Notifier`]. Failures never escape its public
//! methods: they become notifications plus a `bool` or unit return.

use std::sync::Arc;

use common::KeyValueStore;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionTimings;
use crate::models::{LoginCredentials, ProfileUpdate, Role, Session};
use crate::notify::{Notification, Notifier};
use crate::transition::{self, LoginOutcome, RestoreOutcome};

/// Key holding the serialized current session
pub const USER_KEY: &str = "hms_user";

/// Collections reset to an empty list on admin login
pub const BOOTSTRAP_KEYS: [&str; 4] = [
    "hms_invoices",
    "hms_appointments",
    "hms_patients",
    "hms_doctors",
];

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub is_loading: bool,
}

impl SessionState {
    /// Current phase of the authentication lifecycle
    pub fn phase(&self) -> AuthPhase {
        match (&self.session, self.is_loading) {
            (Some(_), _) => AuthPhase::Authenticated,
            (None, true) => AuthPhase::Authenticating,
            (None, false) => AuthPhase::Unauthenticated,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }
}

/// Authentication lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Session manager for the dashboard's current user
///
/// Cloning is cheap and every clone shares the same state. Overlapping
/// `login` calls are not serialized; the last one to commit wins. Setting
/// the current session and writing it to the store happen as one commit, so
/// memory and store always name the same user.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    timings: SessionTimings,
    state: Arc<watch::Sender<SessionState>>,
    // Held while the current session and `hms_user` are updated together.
    commit: Arc<Mutex<()>>,
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// The manager starts unauthenticated with the loading flag set until
    /// [`initialize`](Self::initialize) runs.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            store,
            notifier,
            clock: Arc::new(SystemClock),
            timings: SessionTimings::default(),
            state: Arc::new(state),
            commit: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the clock used for delays and session ids
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the artificial delays
    pub fn with_timings(mut self, timings: SessionTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The current session, if any
    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    /// Whether a transition is in flight
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> AuthPhase {
        self.state.borrow().phase()
    }

    /// Whether the current session has the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.state
            .borrow()
            .session
            .as_ref()
            .is_some_and(|session| session.role == role)
    }

    /// Rehydrate the session persisted by a previous run
    pub async fn initialize(&self) {
        info!("Restoring persisted session");
        self.set_loading(true);

        let raw = match self.store.get(USER_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to read persisted session: {}", e);
                None
            }
        };

        match transition::restore(raw.as_deref()) {
            RestoreOutcome::Absent => {
                info!("No persisted session found");
            }
            RestoreOutcome::Restored(session) => {
                info!("Restored session {} for {}", session.id, session.email);
                let name = session.name.clone();
                let _commit = self.commit.lock().await;
                self.set_session(Some(session));
                self.notifier
                    .notify(Notification::info(format!("Welcome back, {}", name)));
            }
            RestoreOutcome::Corrupt(e) => {
                error!("Discarding persisted session: {}", e);
                let _commit = self.commit.lock().await;
                self.set_session(None);
                self.remove_persisted().await;
                self.notifier.notify(Notification::warning(
                    "Your saved session was invalid. Please log in again.",
                ));
            }
        }

        self.clock.sleep(self.timings.restore_delay).await;
        self.set_loading(false);
    }

    /// Log in with the given credentials
    ///
    /// Returns `true` when the credentials were accepted.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> bool {
        info!("Login attempt for user: {} as {}", email, role);
        self.set_loading(true);

        self.clock.sleep(self.timings.login_delay).await;

        let credentials = LoginCredentials::new(email, password, role);
        match transition::authenticate(&credentials, self.clock.now_millis()) {
            LoginOutcome::Accepted(session) => {
                info!("Created session {} for {}", session.id, session.email);
                let name = session.name.clone();
                {
                    let _commit = self.commit.lock().await;
                    self.set_session(Some(session.clone()));
                    self.persist(&session).await;
                    if session.role == Role::Admin {
                        self.bootstrap_collections().await;
                    }
                }
                self.notifier
                    .notify(Notification::success(format!("Logged in as {}", name)));

                self.clock.sleep(self.timings.settle_delay).await;
                self.set_loading(false);
                true
            }
            LoginOutcome::Rejected => {
                warn!("Rejected login for user: {}", email);
                self.notifier
                    .notify(Notification::error("Login failed: invalid email or password"));
                self.set_loading(false);
                false
            }
        }
    }

    /// Log out and forget the persisted session
    pub async fn logout(&self) {
        info!("Logging out");
        {
            let _commit = self.commit.lock().await;
            self.set_session(None);
            self.remove_persisted().await;
        }
        self.notifier
            .notify(Notification::info("You have been logged out"));
    }

    /// Replace the current session with an updated profile
    ///
    /// Returns `false` when nobody is logged in.
    pub async fn update_profile(&self, update: ProfileUpdate) -> bool {
        {
            let _commit = self.commit.lock().await;
            let Some(current) = self.current_session() else {
                warn!("Profile update without an active session");
                return false;
            };

            let updated = current.apply(update);
            info!("Updating profile for session {}", updated.id);
            self.set_session(Some(updated.clone()));
            self.persist(&updated).await;
        }
        self.notifier
            .notify(Notification::success("Profile updated"));
        true
    }

    /// End the manager's lifetime
    ///
    /// Subscribers observe the channel closing once the last clone is
    /// disposed. Persisted data is kept so the next manager can restore it.
    pub fn dispose(self) {
        info!("Disposing session manager");
        drop(self);
    }

    fn set_session(&self, session: Option<Session>) {
        self.state.send_modify(|state| state.session = session);
    }

    fn set_loading(&self, is_loading: bool) {
        self.state.send_modify(|state| state.is_loading = is_loading);
    }

    async fn persist(&self, session: &Session) {
        let value = match serde_json::to_string(session) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize session {}: {}", session.id, e);
                return;
            }
        };

        if let Err(e) = self.store.set(USER_KEY, &value).await {
            error!("Failed to persist session {}: {}", session.id, e);
        }
    }

    async fn remove_persisted(&self) {
        if let Err(e) = self.store.delete(USER_KEY).await {
            error!("Failed to remove persisted session: {}", e);
        }
    }

    async fn bootstrap_collections(&self) {
        info!("Resetting dashboard collections for admin");
        for key in BOOTSTRAP_KEYS {
            if let Err(e) = self.store.set(key, "[]").await {
                error!("Failed to reset {}: {}", key, e);
            }
        }
    }
}
