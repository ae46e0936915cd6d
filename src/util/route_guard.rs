//! Route authorization: maps a session and a requested path to one outcome.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route in `App` renders through `RouteGate`, which calls [`authorize`]
//! on each session change. The function is pure so the whole path × session
//! table can be tested without a browser.
//!
//! RESUMPTION
//! ==========
//! A signed-out visit to a protected path redirects to `/login?next=<path>`.
//! Once signed in, a public-only route honours `next` if (and only if) it
//! names a known protected path.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use crate::state::auth::{Role, Session};

pub const LANDING_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

/// Query parameter carrying the resumption target on the login path.
pub const RESUME_PARAM: &str = "next";

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Only visitors without a session (landing, login, register).
    PublicOnly,
    AnyAuthenticated,
    Admin,
    Editor,
}

/// Every view reachable through the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Landing,
    Login,
    Register,
    AdminDashboard,
    AdminSettings,
    EditorDashboard,
    EditorSettings,
}

impl AppRoute {
    pub const ALL: [AppRoute; 7] = [
        Self::Landing,
        Self::Login,
        Self::Register,
        Self::AdminDashboard,
        Self::AdminSettings,
        Self::EditorDashboard,
        Self::EditorSettings,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => LANDING_PATH,
            Self::Login => LOGIN_PATH,
            Self::Register => REGISTER_PATH,
            Self::AdminDashboard => "/dashboard",
            Self::AdminSettings => "/dashboard/settings",
            Self::EditorDashboard => "/editor",
            Self::EditorSettings => "/editor/settings",
        }
    }

    #[must_use]
    pub fn requirement(self) -> RouteRequirement {
        match self {
            Self::Landing | Self::Login | Self::Register => RouteRequirement::PublicOnly,
            Self::AdminDashboard | Self::AdminSettings => RouteRequirement::Admin,
            Self::EditorDashboard | Self::EditorSettings => RouteRequirement::Editor,
        }
    }

    /// Look up a route by path. A single trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        self.requirement() != RouteRequirement::PublicOnly
    }
}

/// A navigation the router was asked to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRequest {
    pub path: String,
    /// Value of the `next` query parameter, if any.
    pub resume: Option<String>,
}

impl RouteRequest {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), resume: None }
    }

    #[must_use]
    pub fn with_resume(mut self, resume: Option<String>) -> Self {
        self.resume = resume;
        self
    }
}

/// Redirect target, optionally carrying a resumption path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    pub resume: Option<String>,
}

impl Redirect {
    fn to(path: &'static str) -> Self {
        Self { to: path, resume: None }
    }

    fn to_login(resume: &str) -> Self {
        Self { to: LOGIN_PATH, resume: Some(resume.to_owned()) }
    }

    /// Full href including the encoded resumption query.
    #[must_use]
    pub fn href(&self) -> String {
        match &self.resume {
            Some(resume) => format!("{}?{RESUME_PARAM}={}", self.to, urlencoding::encode(resume)),
            None => self.to.to_owned(),
        }
    }
}

/// Outcome of [`authorize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session still loading; nothing may be decided yet.
    Pending,
    Render(AppRoute),
    Redirect(Redirect),
}

/// Decide what the router shows for `request` under `session`.
#[must_use]
pub fn authorize(session: &Session, request: &RouteRequest) -> RouteDecision {
    if session.loading {
        return RouteDecision::Pending;
    }
    let Some(route) = AppRoute::from_path(&request.path) else {
        return RouteDecision::Redirect(Redirect::to(LANDING_PATH));
    };
    let role = session.identity.as_ref().map(|identity| identity.role);
    decide_route(role, route, route.requirement(), request.resume.as_deref())
}

fn decide_route(role: Option<Role>, route: AppRoute, requirement: RouteRequirement, resume: Option<&str>) -> RouteDecision {
    match (requirement, role) {
        (RouteRequirement::PublicOnly, None) => RouteDecision::Render(route),
        (RouteRequirement::PublicOnly, Some(role)) => RouteDecision::Redirect(Redirect::to(resume_target(resume, role))),
        (RouteRequirement::AnyAuthenticated | RouteRequirement::Admin | RouteRequirement::Editor, None) => {
            RouteDecision::Redirect(Redirect::to_login(route.path()))
        }
        (RouteRequirement::AnyAuthenticated, Some(_))
        | (RouteRequirement::Admin, Some(Role::Admin))
        | (RouteRequirement::Editor, Some(Role::Editor)) => RouteDecision::Render(route),
        (RouteRequirement::Admin, Some(Role::Editor)) => RouteDecision::Redirect(Redirect::to(Role::Editor.home_path())),
        (RouteRequirement::Editor, Some(Role::Admin)) => RouteDecision::Redirect(Redirect::to(Role::Admin.home_path())),
    }
}

/// Where a signed-in user on a public-only route goes next.
#[must_use]
pub fn resume_target(resume: Option<&str>, role: Role) -> &'static str {
    resume
        .and_then(AppRoute::from_path)
        .filter(|route| route.is_protected())
        .map_or_else(|| role.home_path(), AppRoute::path)
}
