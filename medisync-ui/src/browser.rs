//! Browser implementations of the core's storage, timer and notification
//! seams.

use js_sys::{Function, Promise};
use medisync_core::delay::{Delay, Scheduler};
use medisync_core::notifications::{
    DesktopPermission, Notification, NotificationSink, DEFAULT_DESKTOP_TITLE,
};
use medisync_core::theme::SystemPreferences;
use medisync_core::{KeyValueStore, StorageError};
use std::future::Future;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        window()
            .ok_or_else(|| StorageError::Unavailable("window not available".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: format!("{e:?}"),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: format!("{e:?}"),
            })
    }
}

fn millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

/// `setTimeout` wrapped in a promise.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDelay;

impl Delay for BrowserDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        let timeout = millis(duration);
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            let scheduled = window().map(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
            });
            if !matches!(scheduled, Some(Ok(_))) {
                if let Err(err) = resolve.call0(&JsValue::NULL) {
                    log::warn!("delay could not resolve: {err:?}");
                }
            }
        });
        async move {
            if let Err(err) = JsFuture::from(promise).await {
                log::warn!("delay rejected: {err:?}");
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) {
        leptos::set_timeout(task, after);
    }
}

/// Mirrors toasts to the Notification API once permission is granted.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopSink;

impl NotificationSink for DesktopSink {
    fn mirror(&self, notification: &Notification) {
        let title = notification
            .title
            .as_deref()
            .unwrap_or(DEFAULT_DESKTOP_TITLE);
        let options = web_sys::NotificationOptions::new();
        options.set_body(&notification.message);
        options.set_icon("/logo192.png");
        if let Err(err) = web_sys::Notification::new_with_options(title, &options) {
            log::warn!("desktop notification failed: {err:?}");
        }
    }
}

fn notifications_supported() -> bool {
    window()
        .and_then(|w| js_sys::Reflect::has(&w, &JsValue::from_str("Notification")).ok())
        .unwrap_or(false)
}

fn map_permission(permission: web_sys::NotificationPermission) -> DesktopPermission {
    match permission {
        web_sys::NotificationPermission::Granted => DesktopPermission::Granted,
        web_sys::NotificationPermission::Denied => DesktopPermission::Denied,
        _ => DesktopPermission::Default,
    }
}

pub fn desktop_permission() -> DesktopPermission {
    if !notifications_supported() {
        return DesktopPermission::Unsupported;
    }
    map_permission(web_sys::Notification::permission())
}

/// Asks once; an already-decided permission is returned as is.
pub async fn request_desktop_permission() -> DesktopPermission {
    match desktop_permission() {
        DesktopPermission::Default => {}
        decided => return decided,
    }
    let Ok(promise) = web_sys::Notification::request_permission() else {
        return DesktopPermission::Default;
    };
    match JsFuture::from(promise).await {
        Ok(value) => match value.as_string().as_deref() {
            Some("granted") => DesktopPermission::Granted,
            Some("denied") => DesktopPermission::Denied,
            _ => DesktopPermission::Default,
        },
        Err(err) => {
            log::warn!("notification permission request failed: {err:?}");
            DesktopPermission::Default
        }
    }
}

fn media_matches(query: &str) -> bool {
    window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .is_some_and(|m| m.matches())
}

pub fn system_preferences() -> SystemPreferences {
    SystemPreferences {
        prefers_dark: media_matches("(prefers-color-scheme: dark)"),
        prefers_reduced_motion: media_matches("(prefers-reduced-motion: reduce)"),
    }
}

/// Calls `on_change` with the new dark preference whenever the OS colour
/// scheme flips. The listener lives for the whole page.
pub fn watch_color_scheme(on_change: impl Fn(bool) + 'static) {
    let Some(list) = window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
        .flatten()
    else {
        return;
    };
    let watched = list.clone();
    let callback = Closure::<dyn Fn()>::new(move || on_change(watched.matches()));
    if list
        .add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
        .is_ok()
    {
        callback.forget();
    }
}

/// Writes the theme onto `<html>` so the stylesheet can pick it up.
pub fn apply_theme(dark: bool, accent: &str, reduce_motion: bool) {
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let theme = if dark { "dark" } else { "light" };
    warn_on_err("data-theme", root.set_attribute("data-theme", theme));
    let motion = if reduce_motion { "true" } else { "false" };
    warn_on_err("data-reduce-motion", root.set_attribute("data-reduce-motion", motion));
    if let Ok(html) = root.dyn_into::<web_sys::HtmlElement>() {
        warn_on_err("--accent", html.style().set_property("--accent", accent));
    }
}

/// Font and animation preferences as CSS variables on `<html>`.
pub fn apply_preferences(font_size: &str, font_family: &str, animation_speed: f32) {
    let Some(html) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };
    let size = match font_size {
        "small" => "14px",
        "large" => "18px",
        _ => "16px",
    };
    let style = html.style();
    warn_on_err("--font-size", style.set_property("--font-size", size));
    warn_on_err("--font-family", style.set_property("--font-family", font_family));
    let transition = format!("{animation_speed}s");
    warn_on_err("--transition", style.set_property("--transition", &transition));
}

pub fn reload() {
    if let Some(w) = window() {
        warn_on_err("reload", w.location().reload());
    }
}

fn warn_on_err(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("{what} failed: {err:?}");
    }
}
