//! Session store: the single source of truth for "who is logged in".
//!
//! The store bridges server-issued credentials and durable client storage.
//! Every mutation updates the in-memory state and the storage mirror in the
//! same state-lock scope, so the two never drift apart and no reader ever
//! observes a half-applied transition (`user` set but no token, or the
//! reverse).
//!
//! Interested parties subscribe as [`SessionObserver`]s and receive a
//! [`SessionEvent`] plus a consistent [`SessionSnapshot`] after each
//! transition; the navigation controller uses this to move pages on
//! sign-in and sign-out.

mod error;

pub use error::{LoginErrorCategory, SessionError};

use std::sync::{Arc, RwLock};

use tracing::{debug, instrument, warn};

use jobhub_core::{User, UserPatch, UserRole};

use crate::api::types::{LoginRequest, RegisterRequest};
use crate::api::{ApiError, AuthBackend};
use crate::storage::{KeyValueStore, keys, sanitize};

/// MFA challenge data held between "password accepted" and "second factor
/// verified".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaChallenge {
    /// Opaque token identifying the pending verification.
    pub mfa_token: String,
    /// Second-factor methods available to the account.
    pub methods: Vec<String>,
}

/// Consistent view of the session at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The signed-in user, if any.
    pub user: Option<User>,
    /// True iff both a user and an access token are present.
    pub is_authenticated: bool,
    /// Pending MFA challenge, if any.
    pub mfa: Option<MfaChallenge>,
}

impl SessionSnapshot {
    /// Role of the signed-in user, if any.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.user_type)
    }
}

/// A session state transition, delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were accepted and a full session established.
    SignedIn {
        /// Role of the user who signed in.
        role: UserRole,
    },
    /// A session was rebuilt from durable storage at boot.
    Restored {
        /// Role of the restored user.
        role: UserRole,
    },
    /// Password accepted, second factor pending.
    MfaChallenged,
    /// A pending second-factor challenge was abandoned.
    MfaCancelled,
    /// The session ended (logout or rejected refresh).
    SignedOut,
    /// The cached profile changed.
    ProfileUpdated,
}

/// Receives session transitions.
pub trait SessionObserver: Send + Sync {
    /// Called after each state transition, outside the state lock.
    fn session_changed(&self, event: &SessionEvent, snapshot: &SessionSnapshot);
}

/// Result of a successful `login` call.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Full session established.
    Authenticated(User),
    /// A second factor must be verified before tokens are issued.
    MfaRequired {
        /// Methods the account can verify with.
        methods: Vec<String>,
    },
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    mfa: Option<MfaChallenge>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authenticated: self.user.is_some() && self.access_token.is_some(),
            mfa: self.mfa.clone(),
        }
    }
}

/// The session store.
///
/// Cheaply cloneable handle; all clones share one session. Constructed at
/// application bootstrap with its collaborators injected, so tests can run
/// isolated instances against fixture backends and in-memory storage.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn KeyValueStore>,
    device_id: Option<String>,
    state: RwLock<SessionState>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl SessionStore {
    /// Create an empty (unauthenticated) session store.
    ///
    /// `device_id` is attached to login requests when present so the
    /// backend can bind refresh tokens to a device.
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        storage: Arc<dyn KeyValueStore>,
        device_id: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                backend,
                storage,
                device_id,
                state: RwLock::new(SessionState::default()),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register an observer for session transitions.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        let mut observers = self
            .inner
            .observers
            .write()
            .expect("observer lock poisoned");
        observers.push(observer);
    }

    /// Current consistent view of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_read().snapshot()
    }

    /// Whether a full session is established.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    /// The current access token, for authenticated API calls.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state_read().access_token.clone()
    }

    // =========================================================================
    // Lifecycle operations
    // =========================================================================

    /// Hydrate the session from durable storage.
    ///
    /// Tries, in order: adopt a stored access token plus cached user
    /// directly (no network); exchange a stored refresh token and fetch the
    /// profile; give up and settle into a clean unauthenticated state.
    /// Failures at any step fall through to the next - this never returns
    /// an error and never surfaces one to the user.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let access = self.read_key(keys::ACCESS_TOKEN);
        let refresh = self.read_key(keys::REFRESH_TOKEN);
        let cached_user = self.read_key(keys::USER);

        // Fast path: a stored token plus a parseable cached user.
        if let (Some(access), Some(raw)) = (access.as_ref(), cached_user.as_deref()) {
            match serde_json::from_str::<User>(raw) {
                Ok(user) => {
                    let role = user.user_type;
                    if self
                        .install_grant(user, access.clone(), refresh.clone())
                        .is_ok()
                    {
                        debug!("session restored from cached user");
                        self.notify(&SessionEvent::Restored { role });
                        return;
                    }
                }
                Err(error) => {
                    warn!(%error, "discarding unparseable cached user");
                }
            }
        }

        // Refresh path: a stored refresh token, with or without an access
        // token, but no usable cached user.
        if refresh.is_some() {
            if self.refresh_with(false).await.is_ok() {
                match self.fetch_current_user_quiet().await {
                    Ok(role) => {
                        debug!("session restored via refresh");
                        self.notify(&SessionEvent::Restored { role });
                        return;
                    }
                    Err(error) => {
                        warn!(%error, "profile fetch after refresh failed");
                    }
                }
            }
            self.clear_local_session();
            return;
        }

        self.clear_local_session();
    }

    /// Log in with email and password.
    ///
    /// On a full grant, stores both tokens and the user durably and in
    /// memory and clears any stale MFA state. When the backend demands a
    /// second factor, records the challenge and leaves the session
    /// unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the server's message on rejection;
    /// the session stays unauthenticated. Use
    /// [`LoginErrorCategory::classify`] to pick a recovery action.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, SessionError> {
        {
            // A fresh attempt supersedes any pending second-factor
            // challenge, whatever its outcome.
            self.state_write().mfa = None;
        }

        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            device_id: self.inner.device_id.clone(),
        };

        let response = self.inner.backend.login(request).await?;

        if response.requires_mfa {
            let mfa_token = response.mfa_token.ok_or_else(|| {
                SessionError::UnexpectedResponse("MFA required but no mfaToken issued".to_owned())
            })?;
            let methods = response.mfa_methods;
            {
                let mut state = self.state_write();
                state.mfa = Some(MfaChallenge {
                    mfa_token,
                    methods: methods.clone(),
                });
            }
            debug!("login requires a second factor");
            self.notify(&SessionEvent::MfaChallenged);
            return Ok(LoginOutcome::MfaRequired { methods });
        }

        let access = response.access_token.ok_or_else(|| {
            SessionError::UnexpectedResponse("login response missing accessToken".to_owned())
        })?;
        let refresh = response.refresh_token.ok_or_else(|| {
            SessionError::UnexpectedResponse("login response missing refreshToken".to_owned())
        })?;
        let user = response.user.ok_or_else(|| {
            SessionError::UnexpectedResponse("login response missing user".to_owned())
        })?;

        let role = user.user_type;
        self.install_grant(user.clone(), access, Some(refresh))?;
        self.notify(&SessionEvent::SignedIn { role });
        Ok(LoginOutcome::Authenticated(user))
    }

    /// Finish a login whose second factor was verified out-of-band.
    ///
    /// Stores the access token and user and clears the MFA challenge. The
    /// MFA grant carries no refresh token, so the resulting session lives
    /// only as long as the access token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the grant cannot be persisted;
    /// the session is left unauthenticated in that case.
    #[instrument(skip(self, access_token, user))]
    pub fn complete_mfa_login(
        &self,
        access_token: String,
        user: User,
        expires_in: u64,
    ) -> Result<(), SessionError> {
        debug!(expires_in, "completing MFA login");
        let role = user.user_type;
        self.install_grant(user, access_token, None)?;
        self.notify(&SessionEvent::SignedIn { role });
        Ok(())
    }

    /// Abandon a pending second-factor challenge.
    ///
    /// The user backed out of the verification dialog; the challenge is
    /// forgotten and the session stays unauthenticated. A no-op when no
    /// challenge is pending.
    pub fn cancel_mfa(&self) {
        let had_challenge = {
            let mut state = self.state_write();
            state.mfa.take().is_some()
        };
        if had_challenge {
            debug!("pending MFA challenge abandoned");
            self.notify(&SessionEvent::MfaCancelled);
        }
    }

    /// Register a new account.
    ///
    /// The registration grant follows the same storage contract as login.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the server's message on rejection.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, SessionError> {
        let request = RegisterRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        };

        let response = self.inner.backend.register(request).await?;
        let user = response.user;
        let role = user.user_type;
        self.install_grant(
            user.clone(),
            response.access_token,
            Some(response.refresh_token),
        )?;
        self.notify(&SessionEvent::SignedIn { role });
        Ok(user)
    }

    /// End the session.
    ///
    /// Notifies the server on a best-effort basis; local cleanup happens
    /// unconditionally, whatever the network outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let access = self.state_read().access_token.clone();

        if let Some(token) = access {
            if let Err(error) = self.inner.backend.logout(&token).await {
                warn!(%error, "server-side logout failed; clearing local session anyway");
            }
        }

        self.clear_local_session();
        self.notify(&SessionEvent::SignedOut);
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Any failure (no refresh token, server rejection, storage write)
    /// forces a full local logout and is returned to the caller.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        self.refresh_with(true).await
    }

    /// Shallow-merge a patch into the current profile and re-persist it.
    ///
    /// A no-op when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the updated profile cannot be persisted.
    pub fn update_profile(&self, patch: UserPatch) -> Result<(), SessionError> {
        {
            let mut state = self.state_write();
            let Some(user) = state.user.as_mut() else {
                return Ok(());
            };
            user.apply(patch);
            let encoded = serde_json::to_string(user)?;
            self.inner.storage.set(keys::USER, &encoded)?;
        }
        self.notify(&SessionEvent::ProfileUpdated);
        Ok(())
    }

    /// Re-fetch the profile behind the current access token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] without a token, or the
    /// backend/storage error otherwise.
    #[instrument(skip(self))]
    pub async fn fetch_current_user(&self) -> Result<User, SessionError> {
        let access = self
            .state_read()
            .access_token
            .clone()
            .ok_or(SessionError::NotAuthenticated)?;

        let user = self.inner.backend.current_user(&access).await?;
        {
            let mut state = self.state_write();
            let encoded = serde_json::to_string(&user)?;
            self.inner.storage.set(keys::USER, &encoded)?;
            state.user = Some(user.clone());
        }
        self.notify(&SessionEvent::ProfileUpdated);
        Ok(user)
    }

    /// Redeem an email verification token.
    ///
    /// When the backend embeds a token grant in the response, the session
    /// adopts it, signing the user in directly from the link.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the server's message when the token
    /// is invalid or expired.
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<String, SessionError> {
        let response = self.inner.backend.verify_email(token).await?;

        if let (Some(access), Some(user)) = (response.access_token, response.user) {
            let role = user.user_type;
            self.install_grant(user, access, response.refresh_token)?;
            self.notify(&SessionEvent::SignedIn { role });
        }

        Ok(response.message)
    }

    /// Ask the backend to resend the verification email.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the server's message on failure.
    pub async fn resend_verification(&self, email: &str) -> Result<String, SessionError> {
        let response = self.inner.backend.resend_verification(email).await?;
        Ok(response.message)
    }

    /// Start a password reset.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the server's message on failure.
    pub async fn forgot_password(&self, email: &str) -> Result<String, SessionError> {
        let response = self.inner.backend.forgot_password(email).await?;
        Ok(response.message)
    }

    /// Complete a password reset from an emailed token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] with the server's message on failure.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, SessionError> {
        let response = self.inner.backend.reset_password(token, password).await?;
        Ok(response.message)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn refresh_with(&self, emit_sign_out: bool) -> Result<(), SessionError> {
        let stored = self
            .state_read()
            .refresh_token
            .clone()
            .or_else(|| self.read_key(keys::REFRESH_TOKEN));

        let Some(refresh_token) = stored else {
            self.clear_local_session();
            if emit_sign_out {
                self.notify(&SessionEvent::SignedOut);
            }
            return Err(SessionError::MissingRefreshToken);
        };

        match self.inner.backend.refresh(&refresh_token).await {
            Ok(grant) => {
                let persisted = {
                    let mut state = self.state_write();
                    let storage = &self.inner.storage;
                    let result = storage
                        .set(keys::ACCESS_TOKEN, &grant.access_token)
                        .and_then(|()| storage.set(keys::REFRESH_TOKEN, &grant.refresh_token));
                    if result.is_ok() {
                        state.access_token = Some(grant.access_token);
                        state.refresh_token = Some(grant.refresh_token);
                    }
                    result
                };
                if let Err(error) = persisted {
                    warn!(%error, "failed to persist refreshed tokens; signing out");
                    self.clear_local_session();
                    if emit_sign_out {
                        self.notify(&SessionEvent::SignedOut);
                    }
                    return Err(error.into());
                }
                Ok(())
            }
            Err(error) => {
                warn!(%error, "token refresh rejected; signing out");
                self.clear_local_session();
                if emit_sign_out {
                    self.notify(&SessionEvent::SignedOut);
                }
                Err(SessionError::Api(error))
            }
        }
    }

    /// Fetch `/auth/me` during hydration without emitting `ProfileUpdated`.
    async fn fetch_current_user_quiet(&self) -> Result<UserRole, SessionError> {
        let access = self
            .state_read()
            .access_token
            .clone()
            .ok_or(SessionError::NotAuthenticated)?;

        let user = self.inner.backend.current_user(&access).await?;
        let role = user.user_type;
        let mut state = self.state_write();
        let encoded = serde_json::to_string(&user)?;
        self.inner.storage.set(keys::USER, &encoded)?;
        state.user = Some(user);
        Ok(role)
    }

    /// Adopt a token grant: user, access token, optional refresh token.
    ///
    /// Storage is written first, then memory, all inside the state lock;
    /// a failed storage write rolls everything back to the unauthenticated
    /// state so memory and storage stay in step.
    fn install_grant(
        &self,
        user: User,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Result<(), SessionError> {
        let mut state = self.state_write();
        let storage = &self.inner.storage;
        let encoded = serde_json::to_string(&user)?;

        let persisted = storage
            .set(keys::ACCESS_TOKEN, &access_token)
            .and_then(|()| match refresh_token.as_deref() {
                Some(token) => storage.set(keys::REFRESH_TOKEN, token),
                None => storage.remove(keys::REFRESH_TOKEN),
            })
            .and_then(|()| storage.set(keys::USER, &encoded));

        if let Err(error) = persisted {
            for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
                if let Err(cleanup) = storage.remove(key) {
                    warn!(%cleanup, key, "failed to clear storage key after write failure");
                }
            }
            *state = SessionState::default();
            return Err(error.into());
        }

        state.user = Some(user);
        state.access_token = Some(access_token);
        state.refresh_token = refresh_token;
        state.mfa = None;
        Ok(())
    }

    /// Drop every trace of the session, in memory and in storage.
    ///
    /// Storage failures are logged and ignored; local cleanup must not be
    /// blocked by a broken store.
    fn clear_local_session(&self) {
        let mut state = self.state_write();
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
            if let Err(error) = self.inner.storage.remove(key) {
                warn!(%error, key, "failed to clear storage key");
            }
        }
        *state = SessionState::default();
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.inner.storage.get(key) {
            Ok(value) => sanitize(value),
            Err(error) => {
                warn!(%error, key, "storage read failed");
                None
            }
        }
    }

    fn notify(&self, event: &SessionEvent) {
        let snapshot = self.snapshot();
        let observers: Vec<Arc<dyn SessionObserver>> = {
            let guard = self.inner.observers.read().expect("observer lock poisoned");
            guard.clone()
        };
        for observer in observers {
            observer.session_changed(event, &snapshot);
        }
    }

    fn state_read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().expect("session state lock poisoned")
    }

    fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().expect("session state lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use jobhub_core::{Email, UserId};

    use crate::api::types::{
        LoginResponse, MessageResponse, RegisterResponse, TokenGrant, VerifyEmailResponse,
    };
    use crate::storage::MemoryStore;

    /// Backend stub for local-only session tests: every network call
    /// fails except logout.
    struct OfflineBackend;

    #[async_trait]
    impl AuthBackend for OfflineBackend {
        async fn login(&self, _request: LoginRequest) -> Result<LoginResponse, ApiError> {
            Err(unreachable_call())
        }

        async fn register(&self, _request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
            Err(unreachable_call())
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, ApiError> {
            Err(unreachable_call())
        }

        async fn current_user(&self, _access_token: &str) -> Result<User, ApiError> {
            Err(unreachable_call())
        }

        async fn logout(&self, _access_token: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn verify_email(&self, _token: &str) -> Result<VerifyEmailResponse, ApiError> {
            Err(unreachable_call())
        }

        async fn resend_verification(&self, _email: &str) -> Result<MessageResponse, ApiError> {
            Err(unreachable_call())
        }

        async fn forgot_password(&self, _email: &str) -> Result<MessageResponse, ApiError> {
            Err(unreachable_call())
        }

        async fn reset_password(
            &self,
            _token: &str,
            _password: &str,
        ) -> Result<MessageResponse, ApiError> {
            Err(unreachable_call())
        }
    }

    fn unreachable_call() -> ApiError {
        ApiError::Backend {
            status: 503,
            message: "offline".to_owned(),
        }
    }

    fn offline_store() -> (SessionStore, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(Arc::new(OfflineBackend), storage.clone(), None);
        (store, storage)
    }

    fn sample_user(role: UserRole) -> User {
        User {
            id: UserId::new("user-1"),
            email: Email::parse("alex.doe@example.com").expect("valid email"),
            name: "Alex Doe".to_owned(),
            user_type: role,
            status: jobhub_core::AccountStatus::Active,
            avatar: None,
            headline: None,
            location: None,
            about: None,
            skills: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn fresh_store_is_unauthenticated() {
        let (store, _) = offline_store();
        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        assert!(snapshot.mfa.is_none());
    }

    #[test]
    fn mfa_completion_establishes_session_without_refresh_token() {
        let (store, storage) = offline_store();
        store
            .complete_mfa_login("at-mfa".to_owned(), sample_user(UserRole::JobSeeker), 900)
            .expect("complete MFA login");

        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated);
        assert!(snapshot.mfa.is_none());
        assert_eq!(store.access_token().as_deref(), Some("at-mfa"));
        assert_eq!(
            storage.get(keys::ACCESS_TOKEN).expect("get"),
            Some("at-mfa".to_owned())
        );
        assert_eq!(storage.get(keys::REFRESH_TOKEN).expect("get"), None);
    }

    #[test]
    fn cancel_mfa_without_challenge_is_a_no_op() {
        let (store, _) = offline_store();
        store.cancel_mfa();
        assert!(store.snapshot().mfa.is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn update_profile_without_user_is_a_no_op() {
        let (store, storage) = offline_store();
        store
            .update_profile(UserPatch {
                headline: Some("ignored".to_owned()),
                ..UserPatch::default()
            })
            .expect("update profile");

        assert!(store.snapshot().user.is_none());
        assert_eq!(storage.get(keys::USER).expect("get"), None);
    }

    #[test]
    fn update_profile_re_persists_cached_user() {
        let (store, storage) = offline_store();
        store
            .complete_mfa_login("at".to_owned(), sample_user(UserRole::JobSeeker), 900)
            .expect("sign in");

        store
            .update_profile(UserPatch {
                headline: Some("Staff Engineer".to_owned()),
                ..UserPatch::default()
            })
            .expect("update profile");

        let stored = storage.get(keys::USER).expect("get").expect("user stored");
        let parsed: User = serde_json::from_str(&stored).expect("parse");
        assert_eq!(parsed.headline.as_deref(), Some("Staff Engineer"));
    }

    #[tokio::test]
    async fn logout_clears_state_and_storage() {
        let (store, storage) = offline_store();
        store
            .complete_mfa_login("at".to_owned(), sample_user(UserRole::Employer), 900)
            .expect("sign in");

        store.logout().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
            assert_eq!(storage.get(key).expect("get"), None);
        }
    }

    #[tokio::test]
    async fn authenticated_iff_user_and_token_present() {
        // The invariant holds across a full sign-in/sign-out cycle.
        let (store, _) = offline_store();

        let check = |snapshot: &SessionSnapshot| {
            assert_eq!(
                snapshot.is_authenticated,
                snapshot.user.is_some(),
                "user presence must track authentication"
            );
        };

        check(&store.snapshot());
        store
            .complete_mfa_login("at".to_owned(), sample_user(UserRole::Admin), 900)
            .expect("sign in");
        check(&store.snapshot());
        store.logout().await;
        check(&store.snapshot());
    }
}
