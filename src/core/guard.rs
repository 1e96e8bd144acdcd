//! Client-side route guard
//!
//! Pages declare the access they need with a [`PageAccess`] value, collected
//! in a [`RouteTable`]. On every protected page load the guard compares that
//! declaration with the stored session and either authorizes the page or
//! decides where to send the user instead.

use url::form_urlencoded;

use super::session::{Role, Session, UserRecord};
use super::token_store::TokenStore;

pub const LOGIN_PATH: &str = "/login";

/// Access requirement declared by a protected page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageAccess {
    /// `None` means any signed-in user may view the page
    pub required_role: Option<Role>,
}

impl PageAccess {
    pub const fn any_role() -> Self {
        Self {
            required_role: None,
        }
    }

    pub const fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.required_role.is_none_or(|required| required == role)
    }
}

/// Where the guard sends a user who may not see the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// No session; come back to `return_to` after signing in
    Login { return_to: String },
    /// Signed in with the wrong role; go to that role's landing page
    Dashboard(Role),
}

impl Redirect {
    pub fn target(&self) -> String {
        match self {
            Redirect::Login { return_to } => login_url(Some(return_to)),
            Redirect::Dashboard(role) => role.dashboard_path().to_string(),
        }
    }
}

/// Guard state for one page load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Unchecked,
    /// Page has no access declaration
    Public,
    Authorized(UserRecord),
    Redirecting(Redirect),
}

impl GuardState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardState::Authorized(_) | GuardState::Public)
    }

    pub fn redirect_target(&self) -> Option<String> {
        match self {
            GuardState::Redirecting(redirect) => Some(redirect.target()),
            _ => None,
        }
    }
}

pub struct RouteGuard;

impl RouteGuard {
    /// Decide whether `session` may view a page declared with `access`
    pub fn check(access: PageAccess, requested_url: &str, session: Option<&Session>) -> GuardState {
        let Some(session) = session else {
            tracing::debug!("No session for {}, redirecting to login", requested_url);
            return GuardState::Redirecting(Redirect::Login {
                return_to: requested_url.to_string(),
            });
        };

        if access.permits(session.role()) {
            GuardState::Authorized(session.user.clone())
        } else {
            tracing::info!(
                "Role {} may not view {}, redirecting to dashboard",
                session.role(),
                requested_url
            );
            GuardState::Redirecting(Redirect::Dashboard(session.role()))
        }
    }

    /// Same as [`check`](Self::check), reading the session from a store
    pub fn check_store<S: TokenStore>(
        access: PageAccess,
        requested_url: &str,
        store: &S,
    ) -> GuardState {
        Self::check(access, requested_url, store.load().as_ref())
    }
}

/// Login page URL, optionally carrying the page to return to
pub fn login_url(return_to: Option<&str>) -> String {
    match return_to.filter(|r| is_local_path(r) && path_only(r) != LOGIN_PATH) {
        Some(return_to) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("next", return_to)
                .finish();
            format!("{}?{}", LOGIN_PATH, query)
        }
        None => LOGIN_PATH.to_string(),
    }
}

/// Rebuild the requested URL from a router path and query string
pub fn page_url(path: &str, query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Same-origin absolute path (no scheme, no protocol-relative `//host`)
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

fn path_only(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Explicit per-page access declarations
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, PageAccess)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare access for `prefix` and every page below it
    pub fn declare(mut self, prefix: &str, access: PageAccess) -> Self {
        let prefix = prefix.trim_end_matches('/');
        self.entries.push((prefix.to_string(), access));
        self
    }

    /// The portal's routes: one area per role plus the shared profile page
    pub fn standard() -> Self {
        Self::new()
            .declare("/student", PageAccess::role(Role::Student))
            .declare("/faculty", PageAccess::role(Role::Faculty))
            .declare("/admin", PageAccess::role(Role::Admin))
            .declare("/profile", PageAccess::any_role())
    }

    /// Declared access for a URL, using the longest matching prefix
    pub fn access_for(&self, url: &str) -> Option<PageAccess> {
        let path = path_only(url);
        self.entries
            .iter()
            .filter(|(prefix, _)| {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, access)| *access)
    }

    pub fn check(&self, requested_url: &str, session: Option<&Session>) -> GuardState {
        match self.access_for(requested_url) {
            Some(access) => RouteGuard::check(access, requested_url, session),
            None => GuardState::Public,
        }
    }

    /// Where to go after signing in: `next` if it is a local page this user
    /// may view, otherwise the user's dashboard
    pub fn post_login_target(&self, next: Option<&str>, user: &UserRecord) -> String {
        let dashboard = user.role.dashboard_path().to_string();

        let Some(next) = next.filter(|n| is_local_path(n)) else {
            return dashboard;
        };

        if path_only(next) == LOGIN_PATH {
            return dashboard;
        }

        match self.access_for(next) {
            Some(access) if !access.permits(user.role) => dashboard,
            _ => next.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tests::{session_for, user};
    use crate::core::token_store::MemoryTokenStore;

    #[test]
    fn test_no_session_redirects_to_login_never_dashboard() {
        for role in Role::ALL {
            let state = RouteGuard::check(PageAccess::role(role), "/x/page", None);
            assert_eq!(
                state,
                GuardState::Redirecting(Redirect::Login {
                    return_to: "/x/page".to_string()
                })
            );
        }
    }

    #[test]
    fn test_student_on_faculty_page_goes_to_student_dashboard() {
        let session = session_for(Role::Student, "t");
        let table = RouteTable::standard();

        let state = table.check("/faculty/courses", Some(&session));

        assert_eq!(
            state,
            GuardState::Redirecting(Redirect::Dashboard(Role::Student))
        );
        assert_eq!(
            state.redirect_target().as_deref(),
            Some("/student/dashboard")
        );
    }

    #[test]
    fn test_matching_role_is_authorized() {
        let session = session_for(Role::Admin, "t");
        let state = RouteTable::standard().check("/admin/users?page=2", Some(&session));
        assert_eq!(state, GuardState::Authorized(user(Role::Admin)));
    }

    #[test]
    fn test_page_without_role_requirement_admits_every_role() {
        let table = RouteTable::standard();
        for role in Role::ALL {
            let session = session_for(role, "t");
            assert!(table.check("/profile", Some(&session)).is_authorized());
        }
    }

    #[test]
    fn test_dashboards_never_loop() {
        let table = RouteTable::standard();
        for role in Role::ALL {
            let session = session_for(role, "t");
            let state = table.check(role.dashboard_path(), Some(&session));
            assert!(matches!(state, GuardState::Authorized(_)), "{:?}", role);
        }
    }

    #[test]
    fn test_undeclared_pages_are_public() {
        let table = RouteTable::standard();
        assert_eq!(table.check("/", None), GuardState::Public);
        assert_eq!(table.check("/login", None), GuardState::Public);
        assert_eq!(table.check("/studentship", None), GuardState::Public);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = RouteTable::standard()
            .declare("/admin/help", PageAccess::any_role());

        assert_eq!(
            table.access_for("/admin/help/faq"),
            Some(PageAccess::any_role())
        );
        assert_eq!(
            table.access_for("/admin/users"),
            Some(PageAccess::role(Role::Admin))
        );
    }

    #[test]
    fn test_check_store_reads_session() {
        let store = MemoryTokenStore::with_session(session_for(Role::Faculty, "t"));
        let state = RouteGuard::check_store(
            PageAccess::role(Role::Faculty),
            "/faculty/dashboard",
            &store,
        );
        assert!(state.is_authorized());
    }

    #[test]
    fn test_login_url_encodes_return_path() {
        assert_eq!(
            login_url(Some("/student/grades?term=fall 2025")),
            "/login?next=%2Fstudent%2Fgrades%3Fterm%3Dfall+2025"
        );
        assert_eq!(login_url(None), "/login");
        assert_eq!(login_url(Some("https://evil.example")), "/login");
        assert_eq!(login_url(Some("/login?next=/x")), "/login");
    }

    #[test]
    fn test_redirect_target_for_login() {
        let redirect = Redirect::Login {
            return_to: "/admin/users".to_string(),
        };
        assert_eq!(redirect.target(), "/login?next=%2Fadmin%2Fusers");
    }

    #[test]
    fn test_post_login_target() {
        let table = RouteTable::standard();
        let student = user(Role::Student);

        assert_eq!(
            table.post_login_target(Some("/student/grades"), &student),
            "/student/grades"
        );
        assert_eq!(
            table.post_login_target(Some("/admin/users"), &student),
            "/student/dashboard"
        );
        assert_eq!(
            table.post_login_target(Some("//evil.example/x"), &student),
            "/student/dashboard"
        );
        assert_eq!(
            table.post_login_target(Some("/login"), &student),
            "/student/dashboard"
        );
        assert_eq!(table.post_login_target(None, &student), "/student/dashboard");
        assert_eq!(table.post_login_target(Some("/profile"), &student), "/profile");
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/student/dashboard"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("http://evil.example"));
        assert!(!is_local_path("/\\evil.example"));
    }

    #[test]
    fn test_page_url_with_and_without_query() {
        assert_eq!(page_url("/student/grades", ""), "/student/grades");
        assert_eq!(page_url("/student/grades", "term=2"), "/student/grades?term=2");
        assert_eq!(page_url("/student/grades", "?term=2"), "/student/grades?term=2");
    }
}
