//! Routing surface and the authentication guard.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Dashboard,
    Patients,
    PatientDetail(u32),
    Appointments,
    Hospitals,
    Staff,
    Emergencies,
    Settings,
    NotFound,
}

/// Outcome of running a requested route through the guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Side-navigation entries of the authenticated shell, in display order.
pub const NAV_ITEMS: [(&str, Route); 7] = [
    ("Dashboard", Route::Dashboard),
    ("Patients", Route::Patients),
    ("Appointments", Route::Appointments),
    ("Hospitals", Route::Hospitals),
    ("Emergency Cases", Route::Emergencies),
    ("Staff", Route::Staff),
    ("Settings", Route::Settings),
];

impl Route {
    /// Parses a location path, with or without a query string.
    pub fn parse(location: &str) -> Route {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword {
                token: query_param(query, "token"),
            },
            ["dashboard"] => Route::Dashboard,
            ["patients"] => Route::Patients,
            ["patients", id] => id
                .parse()
                .map(Route::PatientDetail)
                .unwrap_or(Route::NotFound),
            ["appointments"] => Route::Appointments,
            ["hospitals"] => Route::Hospitals,
            ["staff"] => Route::Staff,
            ["emergencies"] => Route::Emergencies,
            ["settings"] => Route::Settings,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::ForgotPassword => "/forgot-password".into(),
            Route::ResetPassword { token: None } => "/reset-password".into(),
            Route::ResetPassword { token: Some(t) } => format!("/reset-password?token={t}"),
            Route::Dashboard => "/dashboard".into(),
            Route::Patients => "/patients".into(),
            Route::PatientDetail(id) => format!("/patients/{id}"),
            Route::Appointments => "/appointments".into(),
            Route::Hospitals => "/hospitals".into(),
            Route::Staff => "/staff".into(),
            Route::Emergencies => "/emergencies".into(),
            Route::Settings => "/settings".into(),
            Route::NotFound => "/404".into(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Route::Login
                | Route::Register
                | Route::ForgotPassword
                | Route::ResetPassword { .. }
                | Route::NotFound
        )
    }

    /// Public pages that make no sense for someone already signed in.
    pub fn is_auth_page(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::Register | Route::ForgotPassword | Route::ResetPassword { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub fn guard(route: Route, authenticated: bool) -> Navigation {
    if route.requires_auth() && !authenticated {
        return Navigation::Redirect(Route::Login);
    }
    if route.is_auth_page() && authenticated {
        return Navigation::Redirect(Route::Dashboard);
    }
    Navigation::Render(route)
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_surface_path() {
        let cases = [
            ("/", Route::Dashboard),
            ("/login", Route::Login),
            ("/register/", Route::Register),
            ("/forgot-password", Route::ForgotPassword),
            ("/dashboard", Route::Dashboard),
            ("/patients", Route::Patients),
            ("/patients/12", Route::PatientDetail(12)),
            ("/patients/abc", Route::NotFound),
            ("/appointments", Route::Appointments),
            ("/hospitals", Route::Hospitals),
            ("/staff", Route::Staff),
            ("/emergencies", Route::Emergencies),
            ("/settings", Route::Settings),
            ("/nowhere/at/all", Route::NotFound),
        ];
        for (path, expected) in cases {
            assert_eq!(Route::parse(path), expected, "{path}");
        }
    }

    #[test]
    fn reset_password_keeps_token() {
        let route = Route::parse("/reset-password?foo=1&token=abc123");
        assert_eq!(
            route,
            Route::ResetPassword {
                token: Some("abc123".into())
            }
        );
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(
            Route::parse("/reset-password?token="),
            Route::ResetPassword { token: None }
        );
    }

    #[test]
    fn guard_redirects_anonymous_users_to_login() {
        assert_eq!(
            guard(Route::Dashboard, false),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            guard(Route::PatientDetail(1), false),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(guard(Route::Login, false), Navigation::Render(Route::Login));
        assert_eq!(
            guard(Route::NotFound, false),
            Navigation::Render(Route::NotFound)
        );
    }

    #[test]
    fn guard_sends_signed_in_users_past_auth_pages() {
        assert_eq!(
            guard(Route::Register, true),
            Navigation::Redirect(Route::Dashboard)
        );
        assert_eq!(
            guard(Route::Settings, true),
            Navigation::Render(Route::Settings)
        );
    }

    #[test]
    fn nav_items_are_all_protected() {
        assert!(NAV_ITEMS.iter().all(|(_, r)| r.requires_auth()));
    }
}
