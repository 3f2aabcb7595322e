//! Context objects shared by every page.
//!
//! The core services are not reactive, so each context keeps the signals a
//! view needs and refreshes them after every call into the service.

use crate::browser::{self, BrowserDelay, DesktopSink, LocalStorage, TimeoutScheduler};
use leptos::*;
use medisync_core::notifications::{Notification, NotificationCenter, Severity};
use medisync_core::session::RoleSet;
use medisync_core::theme::ThemeSettings;
use medisync_core::user::ProfileUpdate;
use medisync_core::{
    AppConfig, AuthError, FixtureAuthClient, RegisterRequest, Route, SessionService, User,
};
use std::rc::Rc;

pub type Session = SessionService<FixtureAuthClient<BrowserDelay>, LocalStorage>;

/// Static wiring every page can pull out of context.
#[derive(Clone, Debug)]
pub struct Services {
    pub config: AppConfig,
    pub delay: BrowserDelay,
}

#[derive(Clone)]
pub struct AuthContext {
    session: Rc<Session>,
    pub user: RwSignal<Option<User>>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
}

impl AuthContext {
    fn new(session: Session) -> Self {
        let user = create_rw_signal(session.current_user());
        Self {
            session: Rc::new(session),
            user,
            error: create_rw_signal(None),
            loading: create_rw_signal(false),
        }
    }

    fn sync(&self) {
        self.user.set(self.session.current_user());
        self.error.set(self.session.error());
        self.loading.set(self.session.is_loading());
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.with(Option::is_some)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.user.with(|_| ());
        self.session.has_permission(name)
    }

    pub fn has_role(&self, roles: impl RoleSet) -> bool {
        self.user.with(|_| ());
        self.session.has_role(roles)
    }

    pub fn clear_error(&self) {
        self.session.clear_error();
        self.error.set(None);
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Route, AuthError> {
        self.loading.set(true);
        let result = self.session.login(email, password).await;
        self.sync();
        result
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Route, AuthError> {
        self.loading.set(true);
        let result = self.session.register(request).await;
        self.sync();
        result
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        self.loading.set(true);
        let result = self.session.forgot_password(email).await;
        self.sync();
        result
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<Route, AuthError> {
        self.loading.set(true);
        let result = self.session.reset_password(token, password).await;
        self.sync();
        result
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> Result<User, AuthError> {
        let result = self.session.update_user_profile(update);
        self.sync();
        result
    }

    pub fn logout(&self) -> Route {
        let route = self.session.logout();
        self.sync();
        route
    }
}

#[derive(Clone)]
pub struct Toasts {
    center: NotificationCenter,
    pub items: RwSignal<Vec<Notification>>,
}

impl Toasts {
    fn new(config: &AppConfig) -> Self {
        let center = NotificationCenter::new(
            config.notification_ttl,
            Rc::new(TimeoutScheduler),
            Rc::new(DesktopSink),
        );
        center.set_permission(browser::desktop_permission());
        let items = create_rw_signal(Vec::new());
        center.subscribe(move |list| items.set(list.to_vec()));
        Self { center, items }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.center.success(message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.center.error(message);
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity, title: Option<String>) {
        self.center.show(message, severity, title);
    }

    pub fn dismiss(&self, id: &str) {
        self.center.remove(id);
    }

    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }
}

#[derive(Clone, Copy)]
pub struct Theme {
    pub settings: RwSignal<ThemeSettings>,
}

impl Theme {
    fn new() -> Self {
        let settings = ThemeSettings::load(&LocalStorage, browser::system_preferences())
            .unwrap_or_else(|err| {
                log::warn!("theme settings unreadable, using defaults: {err}");
                ThemeSettings::default()
            });
        let theme = Self {
            settings: create_rw_signal(settings),
        };
        create_effect(move |_| {
            theme.settings.with(|s| {
                browser::apply_theme(s.is_dark(), &s.accent_color, s.reduce_motion);
            });
        });
        browser::watch_color_scheme(move |dark| {
            theme.settings.update(|s| s.follow_system(dark));
        });
        theme
    }

    /// Applies `change` and persists the result.
    pub fn update(&self, change: impl FnOnce(&mut ThemeSettings)) {
        self.settings.update(change);
        if let Err(err) = self.settings.with_untracked(|s| s.save(&LocalStorage)) {
            log::warn!("theme settings not saved: {err}");
        }
    }
}

pub fn provide_app_state() {
    let config = AppConfig::default();
    let client = FixtureAuthClient::new(config.clone(), BrowserDelay);
    let session = SessionService::restore(client, LocalStorage);

    provide_context(AuthContext::new(session));
    provide_context(Toasts::new(&config));
    provide_context(Theme::new());
    provide_context(Services {
        config,
        delay: BrowserDelay,
    });
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

pub fn use_toasts() -> Toasts {
    expect_context::<Toasts>()
}

pub fn use_theme() -> Theme {
    expect_context::<Theme>()
}

pub fn use_services() -> Services {
    expect_context::<Services>()
}
