//! Scenario tests for the JobHub client engine.
//!
//! The tests wire a real [`SessionStore`] and [`NavigationController`]
//! against in-process fixtures: a canned [`FixtureBackend`] in place of the
//! HTTP client, [`MemoryStore`] in place of browser local storage, and a
//! [`RecordingBrowser`] in place of the history API. No network, no
//! browser.
//!
//! Run with: `cargo test -p jobhub-integration-tests`
//!
//! Fixture accounts:
//!
//! | email                    | password      | behavior                    |
//! |--------------------------|---------------|-----------------------------|
//! | `alex.doe@example.com`   | `password123` | job seeker, full grant      |
//! | `maria.lopez@acme.io`    | `password123` | employer, full grant        |
//! | `root@jobhub.dev`        | `password123` | admin, full grant           |
//! | `casey.otp@example.com`  | `password123` | MFA challenge, no tokens    |
//! | `pending@example.com`    | any           | 403, email not verified     |
//! | `locked@example.com`     | any           | 423, account locked         |
//! | anything else            | any           | 401, invalid credentials    |
//!
//! [`SessionStore`]: jobhub_client::session::SessionStore
//! [`NavigationController`]: jobhub_client::navigation::NavigationController
//! [`MemoryStore`]: jobhub_client::storage::MemoryStore

use std::collections::HashMap;
use std::sync::{Mutex, Once};

use async_trait::async_trait;

use jobhub_client::api::types::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse, TokenGrant,
    VerifyEmailResponse,
};
use jobhub_client::api::{ApiError, AuthBackend};
use jobhub_client::navigation::{HistorySink, Page, PageViewSink};
use jobhub_core::{AccountStatus, Email, User, UserId, UserRole};

/// Initialize test logging once per process.
///
/// `RUST_LOG` controls verbosity; output only shows for failing tests.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Fixture users
// ============================================================================

fn user(id: &str, email: &str, name: &str, role: UserRole) -> User {
    User {
        id: UserId::new(id),
        email: Email::parse(email).expect("fixture email is valid"),
        name: name.to_owned(),
        user_type: role,
        status: AccountStatus::Active,
        avatar: None,
        headline: None,
        location: None,
        about: None,
        skills: Vec::new(),
        created_at: None,
    }
}

/// The job seeker fixture account.
#[must_use]
pub fn seeker() -> User {
    user("user-seeker", "alex.doe@example.com", "Alex Doe", UserRole::JobSeeker)
}

/// The employer fixture account.
#[must_use]
pub fn employer() -> User {
    user("user-employer", "maria.lopez@acme.io", "Maria Lopez", UserRole::Employer)
}

/// The admin fixture account.
#[must_use]
pub fn admin() -> User {
    user("user-admin", "root@jobhub.dev", "Site Admin", UserRole::Admin)
}

/// The MFA-enabled fixture account.
#[must_use]
pub fn mfa_user() -> User {
    user("user-mfa", "casey.otp@example.com", "Casey Otp", UserRole::JobSeeker)
}

// ============================================================================
// Fixture auth backend
// ============================================================================

#[derive(Default)]
struct FixtureState {
    calls: Vec<String>,
    sessions: HashMap<String, User>,
    refresh_tokens: HashMap<String, User>,
    counter: u32,
    refresh_down: bool,
    logout_down: bool,
}

/// Canned [`AuthBackend`] with a fixed set of accounts.
///
/// Issues sequentially numbered token pairs (`at-1`/`rt-1`, ...), rotates
/// the refresh token on every exchange, and records the name of every call
/// so tests can assert on network traffic.
#[derive(Default)]
pub struct FixtureBackend {
    state: Mutex<FixtureState>,
}

impl FixtureBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all backend calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// How many times the named endpoint was called.
    #[must_use]
    pub fn call_count(&self, name: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == name).count()
    }

    /// Make every `refresh` call fail with 401, as after server-side
    /// revocation.
    pub fn set_refresh_down(&self, down: bool) {
        self.lock().refresh_down = down;
    }

    /// Make every `logout` call fail with 500.
    pub fn set_logout_down(&self, down: bool) {
        self.lock().logout_down = down;
    }

    /// Register an out-of-band session, as if issued in an earlier visit.
    ///
    /// The access token becomes valid for `current_user` and the refresh
    /// token (when given) becomes exchangeable.
    pub fn seed_session(&self, access: &str, refresh: Option<&str>, account: &User) {
        let mut state = self.lock();
        state.sessions.insert(access.to_owned(), account.clone());
        if let Some(refresh) = refresh {
            state
                .refresh_tokens
                .insert(refresh.to_owned(), account.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureState> {
        self.state.lock().expect("fixture state lock poisoned")
    }

    fn mint(state: &mut FixtureState, account: &User) -> (String, String) {
        state.counter += 1;
        let access = format!("at-{}", state.counter);
        let refresh = format!("rt-{}", state.counter);
        state.sessions.insert(access.clone(), account.clone());
        state
            .refresh_tokens
            .insert(refresh.clone(), account.clone());
        (access, refresh)
    }

    fn rejected(status: u16, message: &str) -> ApiError {
        ApiError::Backend {
            status,
            message: message.to_owned(),
        }
    }
}

#[async_trait]
impl AuthBackend for FixtureBackend {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let mut state = self.lock();
        state.calls.push("login".to_owned());

        let account = match request.email.as_str() {
            "alex.doe@example.com" => seeker(),
            "maria.lopez@acme.io" => employer(),
            "root@jobhub.dev" => admin(),
            "casey.otp@example.com" => {
                if request.password != "password123" {
                    return Err(Self::rejected(401, "Invalid email or password"));
                }
                return Ok(LoginResponse {
                    requires_mfa: true,
                    mfa_token: Some("mfa-pending-7".to_owned()),
                    mfa_methods: vec!["totp".to_owned(), "backup_code".to_owned()],
                    ..LoginResponse::default()
                });
            }
            "pending@example.com" => {
                return Err(Self::rejected(
                    403,
                    "Email not verified. Check your inbox for the link.",
                ));
            }
            "locked@example.com" => {
                return Err(Self::rejected(
                    423,
                    "Account locked after too many failed attempts",
                ));
            }
            _ => return Err(Self::rejected(401, "Invalid email or password")),
        };

        if request.password != "password123" {
            return Err(Self::rejected(401, "Invalid email or password"));
        }

        let (access, refresh) = Self::mint(&mut state, &account);
        Ok(LoginResponse {
            access_token: Some(access),
            refresh_token: Some(refresh),
            token_type: Some("Bearer".to_owned()),
            expires_in: Some(900),
            user: Some(account),
            ..LoginResponse::default()
        })
    }

    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let mut state = self.lock();
        state.calls.push("register".to_owned());

        if request.email == "alex.doe@example.com" {
            return Err(Self::rejected(409, "An account with this email already exists"));
        }

        let account = User {
            id: UserId::new("user-new"),
            email: Email::parse(&request.email)
                .map_err(|_| Self::rejected(400, "Invalid email address"))?,
            name: format!("{} {}", request.first_name, request.last_name),
            user_type: UserRole::NewUser,
            status: AccountStatus::Unverified,
            avatar: None,
            headline: None,
            location: None,
            about: None,
            skills: Vec::new(),
            created_at: None,
        };
        let (access, refresh) = Self::mint(&mut state, &account);
        Ok(RegisterResponse {
            access_token: access,
            refresh_token: refresh,
            token_type: Some("Bearer".to_owned()),
            expires_in: Some(900),
            user: account,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        let mut state = self.lock();
        state.calls.push("refresh".to_owned());

        if state.refresh_down {
            return Err(Self::rejected(401, "Refresh token expired"));
        }
        let Some(account) = state.refresh_tokens.remove(refresh_token) else {
            return Err(Self::rejected(401, "Invalid refresh token"));
        };
        let (access, refresh) = Self::mint(&mut state, &account);
        Ok(TokenGrant {
            access_token: access,
            refresh_token: refresh,
            token_type: Some("Bearer".to_owned()),
            expires_in: Some(900),
        })
    }

    async fn current_user(&self, access_token: &str) -> Result<User, ApiError> {
        let mut state = self.lock();
        state.calls.push("me".to_owned());
        state
            .sessions
            .get(access_token)
            .cloned()
            .ok_or_else(|| Self::rejected(401, "Unauthorized"))
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.calls.push("logout".to_owned());
        if state.logout_down {
            return Err(Self::rejected(500, "Logout temporarily unavailable"));
        }
        state.sessions.remove(access_token);
        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<VerifyEmailResponse, ApiError> {
        let mut state = self.lock();
        state.calls.push("verify_email".to_owned());
        match token {
            "evt-grant" => {
                let account = seeker();
                let (access, refresh) = Self::mint(&mut state, &account);
                Ok(VerifyEmailResponse {
                    message: "Email verified successfully".to_owned(),
                    access_token: Some(access),
                    refresh_token: Some(refresh),
                    user: Some(account),
                })
            }
            "evt-plain" => Ok(VerifyEmailResponse {
                message: "Email verified successfully".to_owned(),
                access_token: None,
                refresh_token: None,
                user: None,
            }),
            _ => Err(Self::rejected(400, "Invalid or expired verification token")),
        }
    }

    async fn resend_verification(&self, _email: &str) -> Result<MessageResponse, ApiError> {
        self.lock().calls.push("resend_verification".to_owned());
        Ok(MessageResponse {
            message: "Verification email sent".to_owned(),
        })
    }

    async fn forgot_password(&self, _email: &str) -> Result<MessageResponse, ApiError> {
        self.lock().calls.push("forgot_password".to_owned());
        Ok(MessageResponse {
            message: "If the address exists, a reset email is on its way".to_owned(),
        })
    }

    async fn reset_password(
        &self,
        token: &str,
        _password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.lock().calls.push("reset_password".to_owned());
        if token == "prt-valid" {
            Ok(MessageResponse {
                message: "Password updated".to_owned(),
            })
        } else {
            Err(Self::rejected(400, "Invalid or expired reset token"))
        }
    }
}

// ============================================================================
// Fixture browser
// ============================================================================

#[derive(Default)]
struct BrowserState {
    path: String,
    query: String,
    pushes: Vec<String>,
    scrolls: u32,
}

/// In-process stand-in for the browser history API.
#[derive(Default)]
pub struct RecordingBrowser {
    state: Mutex<BrowserState>,
}

impl RecordingBrowser {
    /// A browser whose address bar shows the given location.
    #[must_use]
    pub fn at(path: &str, query: &str) -> Self {
        let browser = Self::default();
        browser.set_location(path, query);
        browser
    }

    /// Move the address bar without going through the controller, as the
    /// browser does on back/forward.
    pub fn set_location(&self, path: &str, query: &str) {
        let mut state = self.lock();
        state.path = path.to_owned();
        state.query = query.to_owned();
    }

    /// Every path pushed onto the history stack, in order.
    #[must_use]
    pub fn pushes(&self) -> Vec<String> {
        self.lock().pushes.clone()
    }

    /// How many times the viewport was scrolled to the top.
    #[must_use]
    pub fn scroll_count(&self) -> u32 {
        self.lock().scrolls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BrowserState> {
        self.state.lock().expect("browser state lock poisoned")
    }
}

impl HistorySink for RecordingBrowser {
    fn current_path(&self) -> String {
        self.lock().path.clone()
    }

    fn current_query(&self) -> String {
        self.lock().query.clone()
    }

    fn push(&self, path: &str) {
        let mut state = self.lock();
        state.path = path.to_owned();
        state.query.clear();
        state.pushes.push(path.to_owned());
    }

    fn scroll_to_top(&self) {
        self.lock().scrolls += 1;
    }
}

/// [`PageViewSink`] that records every page view.
#[derive(Default)]
pub struct RecordingAnalytics {
    views: Mutex<Vec<(Page, String)>>,
}

impl RecordingAnalytics {
    /// Every recorded page view, in order.
    #[must_use]
    pub fn views(&self) -> Vec<(Page, String)> {
        self.views.lock().expect("analytics lock poisoned").clone()
    }
}

impl PageViewSink for RecordingAnalytics {
    fn page_view(&self, page: Page, path: &str) {
        self.views
            .lock()
            .expect("analytics lock poisoned")
            .push((page, path.to_owned()));
    }
}
