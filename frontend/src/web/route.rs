//! Route table.
//!
//! Pure data: no DOM or `web_sys` access, so the guard is unit tested on the host.

use std::fmt::Display;

/// Every page of the app.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Landing,
    Impact,
    Signup,
    Login,
    VerifyOtp,
    /// Signed in only.
    DonateTrees,
    /// Signed in only.
    Dashboard,
    /// Signed in only.
    Profile,
    /// Public order status, addressed by tracking token.
    Track(String),
    /// Printable certificate, addressed by tracking token.
    Certificate(String),
    /// Any unmatched path.
    NotFound,
}

impl AppRoute {
    /// Parses a URL path.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] | [""] => Self::Landing,
            ["impact"] => Self::Impact,
            ["signup"] => Self::Signup,
            ["login"] => Self::Login,
            ["verify-otp"] => Self::VerifyOtp,
            ["donate-trees"] => Self::DonateTrees,
            ["dashboard"] => Self::Dashboard,
            ["profile"] => Self::Profile,
            ["track", token] if !token.is_empty() => Self::Track(decode_segment(token)),
            ["certificate", token] if !token.is_empty() => {
                Self::Certificate(decode_segment(token))
            }
            _ => Self::NotFound,
        }
    }

    /// The URL path of this route.
    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Impact => "/impact".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Login => "/login".to_string(),
            Self::VerifyOtp => "/verify-otp".to_string(),
            Self::DonateTrees => "/donate-trees".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Track(token) => format!("/track/{}", urlencoding::encode(token)),
            Self::Certificate(token) => format!("/certificate/{}", urlencoding::encode(token)),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Whether the route needs a session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::DonateTrees | Self::Dashboard | Self::Profile)
    }

    /// Whether a signed-in user is sent away (login, signup).
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// Navbar and footer are hidden on print-style pages.
    pub fn shows_chrome(&self) -> bool {
        !matches!(self, Self::Certificate(_))
    }

    /// Where a guest lands when a session is required.
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// Where a signed-in user lands from the auth pages.
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Guard verdict for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(AppRoute),
    Redirect(AppRoute),
}

/// Decides what a navigation to `target` shows for the given auth state.
pub fn resolve(target: AppRoute, is_authenticated: bool) -> Resolution {
    if target == AppRoute::NotFound {
        return Resolution::Redirect(AppRoute::Landing);
    }
    if target.requires_auth() && !is_authenticated {
        return Resolution::Redirect(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && is_authenticated {
        return Resolution::Redirect(AppRoute::auth_success_redirect());
    }
    Resolution::Render(target)
}

/// Where the current page goes when the session starts or ends; `None` keeps it.
pub fn redirect_on_auth_change(current: &AppRoute, is_authenticated: bool) -> Option<AppRoute> {
    match resolve(current.clone(), is_authenticated) {
        Resolution::Redirect(route) => Some(route),
        Resolution::Render(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROTECTED: [&str; 3] = ["/donate-trees", "/dashboard", "/profile"];
    const PUBLIC: [&str; 5] = ["/", "/impact", "/track/abc", "/certificate/abc", "/verify-otp"];

    #[test]
    fn test_parse_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Landing);
        assert_eq!(AppRoute::from_path(""), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(
            AppRoute::from_path("/track/tok%20123"),
            AppRoute::Track("tok 123".into())
        );
        assert_eq!(AppRoute::from_path("/track/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/track/a/b"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_roundtrip() {
        for path in ["/impact", "/signup", "/login", "/verify-otp", "/profile", "/track/x1", "/certificate/x1"] {
            assert_eq!(AppRoute::from_path(path).to_path(), path);
        }
    }

    #[test]
    fn test_protected_routes_redirect_to_login_when_logged_out() {
        for path in PROTECTED {
            assert_eq!(
                resolve(AppRoute::from_path(path), false),
                Resolution::Redirect(AppRoute::Login),
                "{path}"
            );
        }
    }

    #[test]
    fn test_protected_routes_render_when_logged_in() {
        for path in PROTECTED {
            let route = AppRoute::from_path(path);
            assert_eq!(resolve(route.clone(), true), Resolution::Render(route));
        }
    }

    #[test]
    fn test_public_routes_render_in_both_states() {
        for path in PUBLIC {
            let route = AppRoute::from_path(path);
            assert_eq!(resolve(route.clone(), false), Resolution::Render(route.clone()));
            assert_eq!(resolve(route.clone(), true), Resolution::Render(route));
        }
    }

    #[test]
    fn test_login_and_signup_skip_when_authenticated() {
        assert_eq!(
            resolve(AppRoute::Login, true),
            Resolution::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(resolve(AppRoute::Signup, false), Resolution::Render(AppRoute::Signup));
        assert_eq!(
            resolve(AppRoute::NotFound, true),
            Resolution::Redirect(AppRoute::Landing)
        );
    }

    #[test]
    fn test_chrome_hidden_only_on_certificate() {
        assert!(!AppRoute::Certificate("t".into()).shows_chrome());
        assert!(AppRoute::Track("t".into()).shows_chrome());
        assert!(AppRoute::Landing.shows_chrome());
    }

    #[test]
    fn test_auth_change_moves_only_gated_pages() {
        // logout on a protected page
        assert_eq!(
            redirect_on_auth_change(&AppRoute::Dashboard, false),
            Some(AppRoute::Login)
        );
        // login lands on the dashboard
        assert_eq!(
            redirect_on_auth_change(&AppRoute::Login, true),
            Some(AppRoute::Dashboard)
        );
        assert_eq!(redirect_on_auth_change(&AppRoute::Impact, false), None);
        assert_eq!(redirect_on_auth_change(&AppRoute::Track("t".into()), true), None);
        assert_eq!(redirect_on_auth_change(&AppRoute::Profile, true), None);
    }
}
