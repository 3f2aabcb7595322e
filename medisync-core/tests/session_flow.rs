use futures::executor::block_on;
use medisync_core::delay::NoDelay;
use medisync_core::notifications::{NoopSink, NotificationCenter};
use medisync_core::delay::ManualScheduler;
use medisync_core::routes::{guard, Navigation};
use medisync_core::session::{TOKEN_KEY, USER_KEY};
use medisync_core::{
    AppConfig, FixtureAuthClient, KeyValueStore, MemoryStore, Route, SessionService, UserRole,
};
use std::rc::Rc;

fn session(store: &MemoryStore) -> SessionService<FixtureAuthClient<NoDelay>, MemoryStore> {
    let client = FixtureAuthClient::new(AppConfig::instant(), NoDelay);
    SessionService::restore(client, store.clone())
}

#[test]
fn sign_in_from_a_protected_link_and_reload() {
    let store = MemoryStore::new();
    let service = session(&store);

    let target = Route::parse("/patients");
    assert_eq!(
        guard(target.clone(), service.is_authenticated()),
        Navigation::Redirect(Route::Login)
    );

    let landing = block_on(service.login("admin@medisync.com", "password")).expect("login");
    assert_eq!(landing, Route::Dashboard);
    assert!(service.has_role(UserRole::Admin));
    assert!(service.has_permission("manage_users"));
    assert_eq!(
        guard(target.clone(), service.is_authenticated()),
        Navigation::Render(target)
    );
    assert_eq!(
        guard(Route::Login, service.is_authenticated()),
        Navigation::Redirect(Route::Dashboard)
    );

    // a fresh service over the same storage is already signed in
    let reloaded = session(&store);
    assert_eq!(reloaded.current_user(), service.current_user());
    assert_eq!(reloaded.token(), service.token());

    assert_eq!(reloaded.logout(), Route::Login);
    assert!(!store.contains(USER_KEY));
    assert!(!store.contains(TOKEN_KEY));
    assert!(!session(&store).is_authenticated());
}

#[test]
fn failed_login_surfaces_error_toast() {
    let store = MemoryStore::new();
    let service = session(&store);
    let scheduler = Rc::new(ManualScheduler::new());
    let toasts = NotificationCenter::new(
        AppConfig::default().notification_ttl,
        scheduler.clone(),
        Rc::new(NoopSink),
    );

    let err = block_on(service.login("admin@medisync.com", "wrong")).expect_err("rejected");
    toasts.error(err.to_string());

    assert_eq!(service.error().as_deref(), Some("Invalid email or password"));
    assert!(!service.is_authenticated());
    assert_eq!(store.get(USER_KEY).expect("read"), None);
    assert_eq!(toasts.notifications().len(), 1);

    scheduler.run_all();
    assert!(toasts.notifications().is_empty());
}
