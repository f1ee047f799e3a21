//! Navigation controller: logical pages, the page/path table, and
//! authorization guards.
//!
//! The controller keeps one logical "current page" value consistent with
//! the browser address bar and with what the user last clicked. Pages form
//! a closed enum; the page/path table and every guard match on it
//! exhaustively, so adding a page is a compile-time-checked change.
//!
//! The controller learns about authentication through session events (it
//! implements [`SessionObserver`]) rather than reading session state
//! ambiently, and reacts to sign-in and sign-out with page transitions of
//! its own.

mod history;

pub use history::{HistorySink, NoopAnalytics, PageViewSink};

use std::sync::{Arc, RwLock};

use tracing::debug;

use jobhub_core::{CompanyId, JobSummary, UserRole};

use crate::session::{SessionEvent, SessionObserver, SessionSnapshot};

/// Logical screens of the application.
///
/// Distinct from literal URL paths; [`Page::path`] is the fixed lookup
/// table relating the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Public landing page.
    Landing,
    /// Sign-in form.
    Login,
    /// Registration form.
    Signup,
    /// Password-reset request form.
    ForgotPassword,
    /// Email verification landing (from an emailed link).
    VerifyEmail,
    /// Post-signup role selection.
    Onboarding,
    /// Job search and listing.
    JobSearch,
    /// Detail view of the selected job.
    JobDetails,
    /// Profile of the selected company.
    CompanyProfile,
    /// Conversation list and thread view.
    Messaging,
    /// Job seeker home.
    JobSeekerDashboard,
    /// Employer home.
    EmployerDashboard,
    /// Admin home.
    AdminDashboard,
    /// Job posting form.
    CreateJob,
}

/// Who may enter a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Authenticated,
    Role(UserRole),
}

impl Page {
    /// Every page, for reverse path lookups.
    pub const ALL: [Self; 14] = [
        Self::Landing,
        Self::Login,
        Self::Signup,
        Self::ForgotPassword,
        Self::VerifyEmail,
        Self::Onboarding,
        Self::JobSearch,
        Self::JobDetails,
        Self::CompanyProfile,
        Self::Messaging,
        Self::JobSeekerDashboard,
        Self::EmployerDashboard,
        Self::AdminDashboard,
        Self::CreateJob,
    ];

    /// Canonical URL path for this page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::VerifyEmail => "/verify-email",
            Self::Onboarding => "/onboarding",
            Self::JobSearch => "/jobs",
            Self::JobDetails => "/jobs/details",
            Self::CompanyProfile => "/companies/details",
            Self::Messaging => "/messages",
            Self::JobSeekerDashboard => "/dashboard/job-seeker",
            Self::EmployerDashboard => "/dashboard/employer",
            Self::AdminDashboard => "/dashboard/admin",
            Self::CreateJob => "/jobs/new",
        }
    }

    /// Reverse lookup in the page/path table.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Self::ALL.into_iter().find(|page| page.path() == trimmed)
    }

    const fn required_access(self) -> Access {
        match self {
            Self::Landing
            | Self::Login
            | Self::Signup
            | Self::ForgotPassword
            | Self::VerifyEmail
            | Self::JobSearch
            | Self::JobDetails
            | Self::CompanyProfile => Access::Public,
            Self::Onboarding | Self::Messaging => Access::Authenticated,
            Self::JobSeekerDashboard => Access::Role(UserRole::JobSeeker),
            Self::EmployerDashboard | Self::CreateJob => Access::Role(UserRole::Employer),
            Self::AdminDashboard => Access::Role(UserRole::Admin),
        }
    }

    /// The page a user lands on right after signing in.
    #[must_use]
    pub const fn home_for(role: UserRole) -> Self {
        match role {
            UserRole::NewUser => Self::Onboarding,
            UserRole::JobSeeker => Self::JobSeekerDashboard,
            UserRole::Employer => Self::EmployerDashboard,
            UserRole::Admin => Self::AdminDashboard,
        }
    }
}

/// The controller's view of authentication, kept current via session
/// events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthView {
    /// Whether a full session is established.
    pub is_authenticated: bool,
    /// Role of the signed-in user.
    pub role: Option<UserRole>,
}

impl From<&SessionSnapshot> for AuthView {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            is_authenticated: snapshot.is_authenticated,
            role: snapshot.role(),
        }
    }
}

/// Map a browser location to the page that may actually be shown.
///
/// Unrecognized paths land on [`Page::Landing`]. The verification page is
/// only recognized when the link carries its `token` query parameter.
/// Role-gated pages require a matching authenticated session, otherwise
/// the resolution is forced to [`Page::Login`].
#[must_use]
pub fn resolve_location(path: &str, query: &str, auth: AuthView) -> Page {
    let page = match Page::from_path(path) {
        Some(Page::VerifyEmail) => {
            if query_param(query, "token").is_some() {
                Page::VerifyEmail
            } else {
                Page::Landing
            }
        }
        Some(page) => page,
        None => Page::Landing,
    };
    authorize(page, auth)
}

/// Apply the authorization rules of the page table.
fn authorize(page: Page, auth: AuthView) -> Page {
    let permitted = match page.required_access() {
        Access::Public => true,
        Access::Authenticated => auth.is_authenticated,
        Access::Role(role) => auth.is_authenticated && auth.role == Some(role),
    };
    if permitted { page } else { Page::Login }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}

#[derive(Debug)]
struct NavState {
    current_page: Page,
    selected_job: Option<JobSummary>,
    selected_company: Option<CompanyId>,
    verification_token: Option<String>,
    auth: AuthView,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            current_page: Page::Landing,
            selected_job: None,
            selected_company: None,
            verification_token: None,
            auth: AuthView::default(),
        }
    }
}

/// The navigation controller.
///
/// Cheaply cloneable handle; all clones share one navigation state.
#[derive(Clone)]
pub struct NavigationController {
    inner: Arc<NavigationInner>,
}

struct NavigationInner {
    history: Arc<dyn HistorySink>,
    analytics: Arc<dyn PageViewSink>,
    state: RwLock<NavState>,
}

impl NavigationController {
    /// Create a controller starting on [`Page::Landing`].
    ///
    /// Call [`Self::mount`] once at startup to adopt the browser's actual
    /// location.
    #[must_use]
    pub fn new(history: Arc<dyn HistorySink>, analytics: Arc<dyn PageViewSink>) -> Self {
        Self {
            inner: Arc::new(NavigationInner {
                history,
                analytics,
                state: RwLock::new(NavState::default()),
            }),
        }
    }

    /// The current logical page.
    #[must_use]
    pub fn current_page(&self) -> Page {
        self.state_read().current_page
    }

    /// The most recently selected job, for the details page.
    #[must_use]
    pub fn selected_job(&self) -> Option<JobSummary> {
        self.state_read().selected_job.clone()
    }

    /// The most recently selected company, for the profile page.
    #[must_use]
    pub fn selected_company(&self) -> Option<CompanyId> {
        self.state_read().selected_company.clone()
    }

    /// Verification token captured from a `/verify-email` link, consumed
    /// by the verification page.
    #[must_use]
    pub fn verification_token(&self) -> Option<String> {
        self.state_read().verification_token.clone()
    }

    /// Resolve the initial page from the browser's current location.
    ///
    /// When guards redirect away from the requested path (e.g. a gated
    /// dashboard while signed out), the canonical path of the resolved
    /// page is pushed so the address bar matches what is shown.
    pub fn mount(&self) {
        let path = self.inner.history.current_path();
        let query = self.inner.history.current_query();
        let auth = self.state_read().auth;

        let page = self.guard(resolve_location(&path, &query, auth));
        self.capture_verification_token(page, &query);
        debug!(?page, %path, "resolved initial location");

        if page.path() == path {
            self.enter(page, false, false);
        } else {
            self.navigate(page);
        }
    }

    /// Navigate to a logical page.
    ///
    /// Applies the selection and authorization guards, updates state,
    /// pushes the canonical path when it differs from the address bar,
    /// records a page view, and resets scroll.
    pub fn navigate(&self, page: Page) {
        let target = self.guard(page);
        if target != page {
            debug!(requested = ?page, resolved = ?target, "navigation redirected");
        }
        self.enter(target, true, true);
    }

    /// Adopt the location after a browser back/forward event.
    ///
    /// Resolution mirrors [`Self::mount`]: same table, same guards. The
    /// address bar already changed, so nothing is pushed and scroll is
    /// left to the browser's own restoration.
    pub fn handle_pop(&self) {
        let path = self.inner.history.current_path();
        let query = self.inner.history.current_query();
        let auth = self.state_read().auth;

        let page = self.guard(resolve_location(&path, &query, auth));
        self.capture_verification_token(page, &query);
        self.enter(page, false, false);
    }

    /// Select a job and open its details page.
    pub fn open_job(&self, job: JobSummary) {
        {
            let mut state = self.state_write();
            state.selected_job = Some(job);
        }
        self.navigate(Page::JobDetails);
    }

    /// Select a company and open its profile page.
    pub fn open_company(&self, company: CompanyId) {
        {
            let mut state = self.state_write();
            state.selected_company = Some(company);
        }
        self.navigate(Page::CompanyProfile);
    }

    /// Detail pages must never be entered without their selection; fall
    /// back to the owning list page instead. Everything else goes through
    /// the authorization table.
    fn guard(&self, page: Page) -> Page {
        let state = self.state_read();
        match page {
            Page::JobDetails if state.selected_job.is_none() => Page::JobSearch,
            Page::CompanyProfile if state.selected_company.is_none() => Page::JobSearch,
            _ => authorize(page, state.auth),
        }
    }

    fn enter(&self, page: Page, push: bool, scroll: bool) {
        {
            let mut state = self.state_write();
            state.current_page = page;
        }

        let path = page.path();
        if push && self.inner.history.current_path() != path {
            self.inner.history.push(path);
        }
        self.inner.analytics.page_view(page, path);
        if scroll {
            self.inner.history.scroll_to_top();
        }
    }

    fn capture_verification_token(&self, page: Page, query: &str) {
        let token = if page == Page::VerifyEmail {
            query_param(query, "token")
        } else {
            None
        };
        let mut state = self.state_write();
        state.verification_token = token;
    }

    fn state_read(&self) -> std::sync::RwLockReadGuard<'_, NavState> {
        self.inner
            .state
            .read()
            .expect("navigation state lock poisoned")
    }

    fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, NavState> {
        self.inner
            .state
            .write()
            .expect("navigation state lock poisoned")
    }
}

impl SessionObserver for NavigationController {
    fn session_changed(&self, event: &SessionEvent, snapshot: &SessionSnapshot) {
        {
            let mut state = self.state_write();
            state.auth = AuthView::from(snapshot);
        }

        match event {
            SessionEvent::SignedIn { role } => self.navigate(Page::home_for(*role)),
            SessionEvent::SignedOut => {
                {
                    let mut state = self.state_write();
                    state.selected_job = None;
                    state.selected_company = None;
                }
                self.navigate(Page::Landing);
            }
            SessionEvent::Restored { .. }
            | SessionEvent::MfaChallenged
            | SessionEvent::MfaCancelled
            | SessionEvent::ProfileUpdated => {}
        }
    }
}
